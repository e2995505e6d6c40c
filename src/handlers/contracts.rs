use crate::{
    error::AppError,
    models::{ApiResponse, Contract, ContractRequest},
    services::ContractService,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ContractsState {
    pub contracts: Arc<dyn ContractService>,
}

pub async fn create_contract(
    State(state): State<ContractsState>,
    payload: Result<Json<ContractRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Contract>>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(vec![rejection.body_text()]))?;
    request.validate().map_err(AppError::Validation)?;

    let outcome = state.contracts.create(&request).await?;

    Ok((status_of(&outcome), Json(outcome)))
}

pub async fn find_contract(
    State(state): State<ContractsState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Contract>>), AppError> {
    let outcome = state.contracts.fetch_by_id(&id).await?;

    Ok((status_of(&outcome), Json(outcome)))
}

fn status_of<T>(outcome: &ApiResponse<T>) -> StatusCode {
    StatusCode::from_u16(outcome.status_code).unwrap_or(StatusCode::OK)
}
