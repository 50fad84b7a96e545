//! Brokerage client facade composing credentials, pacing, tokens, dispatch, and normalization.

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::AccessToken,
	classify::StatusFieldClassifier,
	codes::ExchangeCode,
	config::{ClientPolicy, Credentials},
	dispatch::{Dispatcher, RequestSpec},
	error::ConfigError,
	http::ApiHttpClient,
	normalize::brokerage,
	obs::CallKind,
	range,
	record::{CanonicalQuote, ChartQuery, ChartSeries},
};

/// Domestic stock quote endpoint.
pub const DOMESTIC_QUOTE_ENDPOINT: &str = "/uapi/domestic-stock/v1/quotations/inquire-price";
/// Domestic stock quote transaction.
pub const DOMESTIC_QUOTE_TR_ID: &str = "FHKST01010100";
/// Foreign stock quote endpoint.
pub const FOREIGN_QUOTE_ENDPOINT: &str = "/uapi/overseas-price/v1/quotations/price";
/// Foreign stock quote transaction.
pub const FOREIGN_QUOTE_TR_ID: &str = "HHDFS00000300";
/// Domestic period chart endpoint.
pub const CHART_ENDPOINT: &str = "/uapi/domestic-stock/v1/quotations/inquire-daily-itemchartprice";
/// Domestic period chart transaction.
pub const CHART_TR_ID: &str = "FHKST03010100";

const STOCK_MARKET_DIVISION: &str = "J";

/// Rate-limited, token-authenticated brokerage client.
///
/// Each instance owns its own token cache and rate window; clones of the underlying transport
/// do not share either. Construct one client per credential set and share it by reference.
pub struct BrokerageClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	credentials: Arc<Credentials>,
	dispatcher: Dispatcher<C>,
}
#[cfg(feature = "reqwest")]
impl BrokerageClient<ReqwestHttpClient> {
	/// Creates a client with brokerage pacing and a default reqwest transport.
	pub fn new(credentials: Credentials) -> Result<Self> {
		Self::with_policy(credentials, ClientPolicy::BROKERAGE)
	}

	/// Creates a client with a custom pacing policy and a default reqwest transport.
	pub fn with_policy(credentials: Credentials, policy: ClientPolicy) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(credentials.request_timeout)
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self::with_http_client(credentials, policy, ReqwestHttpClient::with_client(client)))
	}
}
impl<C> BrokerageClient<C>
where
	C: ApiHttpClient,
{
	/// Creates a client on top of a caller-supplied transport.
	pub fn with_http_client(
		credentials: Credentials,
		policy: ClientPolicy,
		http_client: C,
	) -> Self {
		Self::with_shared_http_client(credentials, policy, Arc::new(http_client))
	}
}
impl<C> BrokerageClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client on top of a shared transport.
	pub fn with_shared_http_client(
		credentials: Credentials,
		policy: ClientPolicy,
		http_client: Arc<C>,
	) -> Self {
		let credentials = Arc::new(credentials);
		let dispatcher = Dispatcher::new(
			http_client,
			credentials.clone(),
			policy,
			StatusFieldClassifier::BROKERAGE,
		);

		Self { credentials, dispatcher }
	}

	/// Credentials this client was built with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Pacing policy applied to every request.
	pub fn policy(&self) -> &ClientPolicy {
		self.dispatcher.policy()
	}

	/// Dispatcher for endpoints without a dedicated method.
	pub fn dispatcher(&self) -> &Dispatcher<C> {
		&self.dispatcher
	}

	/// Returns the bearer token, issuing it on first use.
	pub async fn access_token(&self) -> Result<AccessToken> {
		self.dispatcher.tokens().token().await
	}

	/// Fetches the current quote of a domestic stock.
	///
	/// `market` is a display label (`KOSPI`, `KOSDAQ`) copied into the record.
	pub async fn domestic_quote(&self, symbol: &str, market: &str) -> Result<CanonicalQuote> {
		let symbol = require_symbol(symbol)?;
		let spec = RequestSpec::get(DOMESTIC_QUOTE_ENDPOINT, DOMESTIC_QUOTE_TR_ID)
			.param("FID_COND_MRKT_DIV_CODE", STOCK_MARKET_DIVISION)
			.param("FID_INPUT_ISCD", symbol);
		let payload = self.dispatcher.send(&spec, CallKind::DomesticQuote).await?;

		Ok(brokerage::domestic_quote(&payload, symbol, market))
	}

	/// Fetches the current quote of a foreign stock.
	///
	/// `exchange` is a market label (`NASDAQ`, `NYSE`, `AMEX`); unknown labels are sent as-is.
	pub async fn foreign_quote(&self, symbol: &str, exchange: &str) -> Result<CanonicalQuote> {
		let symbol = require_symbol(symbol)?;
		let spec = RequestSpec::get(FOREIGN_QUOTE_ENDPOINT, FOREIGN_QUOTE_TR_ID)
			.param("AUTH", "")
			.param("EXCD", ExchangeCode::resolve(exchange))
			.param("SYMB", symbol);
		let payload = self.dispatcher.send(&spec, CallKind::ForeignQuote).await?;

		Ok(brokerage::foreign_quote(&payload, symbol, exchange))
	}

	/// Fetches a validated chart, deriving the date window when the query leaves it open.
	pub async fn chart(&self, query: &ChartQuery) -> Result<ChartSeries> {
		let symbol = require_symbol(&query.symbol)?;
		let range = range::resolve_range(
			self.policy().today(),
			query.granularity,
			query.count,
			query.start,
			query.end,
		);
		let spec = RequestSpec::get(CHART_ENDPOINT, CHART_TR_ID)
			.param("FID_COND_MRKT_DIV_CODE", STOCK_MARKET_DIVISION)
			.param("FID_INPUT_ISCD", symbol)
			.param("FID_INPUT_DATE_1", range.start_label()?)
			.param("FID_INPUT_DATE_2", range.end_label()?)
			.param("FID_PERIOD_DIV_CODE", query.granularity.code())
			.param("FID_ORG_ADJ_PRC", if query.adjusted { "0" } else { "1" });
		let payload = self.dispatcher.send(&spec, CallKind::Chart).await?;

		Ok(brokerage::chart_series(&payload, query, range))
	}
}
impl<C> Debug for BrokerageClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrokerageClient").field("dispatcher", &self.dispatcher).finish()
	}
}

fn require_symbol(symbol: &str) -> Result<&str, ConfigError> {
	let trimmed = symbol.trim();

	if trimmed.is_empty() {
		return Err(ConfigError::InvalidSetting { field: "symbol", value: symbol.to_owned() });
	}

	Ok(trimmed)
}
