//! Prediction endpoint: form → feature vector → model → rendered result.

use axum::extract::rejection::FormRejection;
use axum::{extract::State, response::Html, Form};
use serde::Serialize;
use tracing::debug;
use vitalis_common::{FeatureVector, RawSubmission};
use vitalis_model::Prediction;

use crate::error::WebError;
use crate::state::SharedState;

#[derive(Serialize)]
struct EchoedInput {
    name: &'static str,
    value: String,
}

#[derive(Serialize)]
struct ResultPage {
    prediction: String,
    decoded: bool,
    inputs: Vec<EchoedInput>,
}

/// Field values are coerced leniently, so only an unreadable form body, a
/// model failure or a render failure produce the plain-text error.
pub async fn predict(
    State(state): State<SharedState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Html<String>, WebError> {
    let submission = match form {
        Ok(Form(fields)) => RawSubmission::from(fields),
        // A body that is not form-encoded carries no form fields
        Err(FormRejection::InvalidFormContentType(rejection)) => {
            debug!(%rejection, "Non-form body, predicting on defaults");
            RawSubmission::default()
        }
        Err(rejection) => return Err(rejection.into()),
    };
    let features = FeatureVector::assemble(&submission);

    let prediction = state.models.predict(&features)?;
    debug!(fields = submission.len(), %prediction, "Prediction served");

    let page = ResultPage {
        decoded: matches!(prediction, Prediction::Label(_)),
        prediction: prediction.to_string(),
        inputs: features
            .named()
            .map(|(name, value)| EchoedInput { name, value: value.to_string() })
            .collect(),
    };
    Ok(Html(state.templates.render("result.html", page)?))
}
