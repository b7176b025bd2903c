use portal_logging::{portal_error, portal_info, portal_warn};

use crate::{ApiError, Generation, JobBoardApi, SearchQuery, SearchReport};

/// Runs the primary query and falls back to the public listing once if it
/// fails. Only when the fallback fails too does an error come back.
pub async fn run_search(
    api: &dyn JobBoardApi,
    generation: Generation,
    query: &SearchQuery,
) -> Result<SearchReport, ApiError> {
    let primary = match query {
        SearchQuery::Matches => {
            portal_info!("search #{generation}: personalized matches");
            api.matches().await
        }
        SearchQuery::Filtered(pairs) => {
            portal_info!("search #{generation}: filtered by {} parameter(s)", pairs.len());
            api.search(pairs).await
        }
    };

    let primary_err = match primary {
        Ok(payload) => {
            return Ok(SearchReport {
                payload,
                fallback_reason: None,
            })
        }
        Err(err) => err,
    };

    portal_warn!("search #{generation} failed ({primary_err}); using public listing");
    match api.public_listing().await {
        Ok(payload) => Ok(SearchReport {
            payload,
            fallback_reason: Some(primary_err),
        }),
        Err(fallback_err) => {
            portal_error!("search #{generation}: public listing failed too ({fallback_err})");
            Err(fallback_err)
        }
    }
}
