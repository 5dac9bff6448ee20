//! JSON-over-HTTP implementation of [`TransactionsApi`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use shared::{
    domain::{Employee, Transaction},
    error::ApiError,
    protocol::{
        PaginatedRequestParams, PaginatedTransactions, RequestByEmployeeParams,
        SetTransactionApprovalParams, EMPLOYEES_ROUTE, PAGINATED_TRANSACTIONS_ROUTE,
        SET_TRANSACTION_APPROVAL_ROUTE, TRANSACTIONS_BY_EMPLOYEE_ROUTE,
    },
};
use url::Url;

use crate::{config::ClientSettings, error::ClientError, TransactionsApi};

#[derive(Debug, Clone)]
pub struct HttpTransactionsApi {
    http: Client,
    base_url: Url,
}

impl HttpTransactionsApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(&settings.server_url).map_err(|source| ClientError::InvalidServerUrl {
                url: settings.server_url.clone(),
                source,
            })?;
        // Routes are joined relative to the base, so a path prefix must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(ClientError::ClientBuild)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<B, R>(&self, route: &'static str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self
            .base_url
            .join(route.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidServerUrl {
                url: format!("{}{route}", self.base_url),
                source,
            })?;

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<R>()
                .await
                .map_err(|source| ClientError::Transport { route, source });
        }

        match response.json::<ApiError>().await {
            Ok(error) => Err(ClientError::Api { route, error }),
            Err(_) => Err(ClientError::UnexpectedStatus {
                route,
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl TransactionsApi for HttpTransactionsApi {
    async fn employees(&self) -> Result<Vec<Employee>, ClientError> {
        self.post(EMPLOYEES_ROUTE, &serde_json::json!({})).await
    }

    async fn paginated_transactions(
        &self,
        params: PaginatedRequestParams,
    ) -> Result<PaginatedTransactions, ClientError> {
        self.post(PAGINATED_TRANSACTIONS_ROUTE, &params).await
    }

    async fn transactions_by_employee(
        &self,
        params: RequestByEmployeeParams,
    ) -> Result<Vec<Transaction>, ClientError> {
        self.post(TRANSACTIONS_BY_EMPLOYEE_ROUTE, &params).await
    }

    async fn set_transaction_approval(
        &self,
        params: SetTransactionApprovalParams,
    ) -> Result<(), ClientError> {
        let _: IgnoredAny = self.post(SET_TRANSACTION_APPROVAL_ROUTE, &params).await?;
        Ok(())
    }
}
