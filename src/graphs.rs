//! Saving, listing and loading a user's graphs.

use crate::api::{GraphId, PlaygroundBackend, SaveGraphRequest, SaveGraphResponse, SavedGraph};
use crate::defaults::SweepRange;
use crate::error::PlaygroundError;
use crate::features::{FeatureSnapshot, ScalarFeature};
use crate::session::Session;
use crate::sweep::{ValidationError, validate_range};

/// Persist the current form as a named graph for the signed-in user.
///
/// Requires a signed-in user, a non-blank name and a generated series, all
/// checked before any network traffic.
pub fn save_graph(
    backend: &dyn PlaygroundBackend,
    session: &Session,
    name: &str,
    snapshot: FeatureSnapshot,
    x_axis: ScalarFeature,
    range: SweepRange,
) -> Result<SaveGraphResponse, PlaygroundError> {
    let user_id = session.require_user()?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingGraphName.into());
    }
    if session.graph_data().is_none() {
        return Err(ValidationError::NothingToSave.into());
    }
    validate_range(range.x_min, range.x_max, range.steps)?;
    let request = SaveGraphRequest {
        user_id,
        name: name.to_string(),
        x_axis: x_axis.backend_name().to_string(),
        x_min: range.x_min,
        x_max: range.x_max,
        x_steps: range.steps,
        features: snapshot,
    };
    let response = backend.save_graph(&request)?;
    backend.invalidate_saved_graphs(user_id);
    tracing::info!(user_id, name, graph_id = ?response.graph_id, "Saved graph");
    Ok(response)
}

/// Saved graphs belonging to the signed-in user.
pub fn list_saved_graphs(
    backend: &dyn PlaygroundBackend,
    session: &Session,
) -> Result<Vec<SavedGraph>, PlaygroundError> {
    let user_id = session.require_user()?;
    Ok(backend.fetch_saved_graphs(user_id)?)
}

/// Fetch a graph and make it the form's source of defaults.
pub fn load_graph<'s>(
    backend: &dyn PlaygroundBackend,
    session: &'s mut Session,
    id: GraphId,
) -> Result<&'s SavedGraph, PlaygroundError> {
    session.require_user()?;
    let graph = backend.load_graph(id)?;
    tracing::info!(graph_id = id, name = %graph.name, "Loaded saved graph");
    Ok(session.set_loaded_graph(graph))
}
