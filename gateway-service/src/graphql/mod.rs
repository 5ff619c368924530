//! GraphQL adapter over the verification operation.
//!
//! Exposes `getInvoice` and `getInvoicesByZois` queries backed by the same
//! fiscal client as the REST routes.

use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql::{
    Context, EmptyMutation, EmptySubscription, InputValueError, InputValueResult, Object, Scalar,
    ScalarType, Schema, SimpleObject, Value,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use fiscal_core::furs::{FursClient, VerificationReport};

use crate::AppState;

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// ISO-8601 date-time scalar. Serializes as a UTC string with
/// milliseconds (`2023-03-20T15:03:05.000Z`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Date(pub DateTime<Utc>);

#[Scalar(name = "Date")]
impl ScalarType for Date {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => {
                let parsed = DateTime::parse_from_rfc3339(&s).map_err(InputValueError::custom)?;
                Ok(Date(parsed.with_timezone(&Utc)))
            }
            _ => Err(InputValueError::expected_type(value)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// A verified invoice.
#[derive(Debug, SimpleObject)]
pub struct Invoice {
    pub zoi: String,
    pub tax: String,
    pub amount: String,
    pub date: Date,
    pub token: String,
}

impl Invoice {
    fn from_report(zoi: String, report: VerificationReport) -> async_graphql::Result<Self> {
        let date = DateTime::parse_from_rfc3339(&report.date)
            .map_err(|e| {
                async_graphql::Error::new(format!("invalid DATETIME from upstream: {e}"))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            zoi,
            tax: report.tax,
            amount: report.amount,
            date: Date(date),
            token: report.token,
        })
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Look up a single invoice by its protection code.
    async fn get_invoice(
        &self,
        ctx: &Context<'_>,
        zoi: String,
        token: String,
    ) -> async_graphql::Result<Invoice> {
        let furs = ctx.data_unchecked::<FursClient>();
        let report = furs.check_invoice(&zoi, &token).await?;

        Invoice::from_report(zoi, report)
    }

    /// Look up several invoices. Calls run sequentially and results keep
    /// the input order; the first failure aborts the batch.
    async fn get_invoices_by_zois(
        &self,
        ctx: &Context<'_>,
        zois: Vec<String>,
        token: String,
    ) -> async_graphql::Result<Vec<Invoice>> {
        let furs = ctx.data_unchecked::<FursClient>();

        let mut invoices = Vec::with_capacity(zois.len());
        for zoi in zois {
            let report = furs.check_invoice(&zoi, &token).await?;
            invoices.push(Invoice::from_report(zoi, report)?);
        }

        Ok(invoices)
    }
}

pub fn build_schema(furs: FursClient) -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(furs)
        .finish()
}

pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// Interactive GraphQL client page; development aid only.
pub async fn playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
