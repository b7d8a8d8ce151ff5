//! Request/response shapes for the `/search` endpoint. `Request` and
//! `Journey` already carry `serde` impls behind `raptor_core`'s `serde`
//! feature; the one thing worth a DTO is `max_number_of_transfers`, which
//! must reach [`TuningParams::with_max_transfers`] as a raw `i64` so a
//! negative value comes back as a typed [`RaptorError`] instead of a
//! generic deserialization failure.

use raptor_core::prelude::{RaptorError, Request, TripSearchStrategy, TuningParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub request: Request,
    #[serde(default)]
    pub tuning: TuningDto,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TuningDto {
    pub max_number_of_transfers: i64,
    pub board_slack_seconds: u32,
    pub alight_slack_seconds: u32,
    pub trip_search_strategy: TripSearchStrategy,
}

impl Default for TuningDto {
    fn default() -> Self {
        let defaults = TuningParams::default();
        TuningDto {
            max_number_of_transfers: defaults.max_number_of_transfers as i64,
            board_slack_seconds: defaults.board_slack_seconds,
            alight_slack_seconds: defaults.alight_slack_seconds,
            trip_search_strategy: defaults.trip_search_strategy,
        }
    }
}

impl TryFrom<TuningDto> for TuningParams {
    type Error = RaptorError;

    fn try_from(dto: TuningDto) -> Result<Self, Self::Error> {
        TuningParams {
            board_slack_seconds: dto.board_slack_seconds,
            alight_slack_seconds: dto.alight_slack_seconds,
            trip_search_strategy: dto.trip_search_strategy,
            ..TuningParams::default()
        }
        .with_max_transfers(dto.max_number_of_transfers)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<RaptorError> for ErrorBody {
    fn from(err: RaptorError) -> Self {
        ErrorBody { error: err.to_string() }
    }
}
