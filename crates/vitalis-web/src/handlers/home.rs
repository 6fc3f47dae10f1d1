//! Input form.

use axum::{extract::State, response::Html};
use serde::Serialize;
use vitalis_common::{FeatureKind, FEATURE_ORDER};
use vitalis_model::ArtifactInfo;

use crate::error::WebError;
use crate::state::SharedState;

#[derive(Serialize)]
struct FormField {
    name: &'static str,
    label: String,
    kind: FeatureKind,
}

#[derive(Serialize)]
struct HomePage<'a> {
    features: Vec<FormField>,
    model: String,
    decoded: bool,
    artifacts: &'a [ArtifactInfo],
}

pub async fn home(State(state): State<SharedState>) -> Result<Html<String>, WebError> {
    let features = FEATURE_ORDER
        .iter()
        .map(|spec| FormField {
            name: spec.name,
            label: spec.name.replace('_', " "),
            kind: spec.kind,
        })
        .collect();

    let page = HomePage {
        features,
        model: state.models.describe(),
        decoded: state.models.has_decoder(),
        artifacts: state.models.artifacts(),
    };
    Ok(Html(state.templates.render("home.html", page)?))
}
