use serde::{Deserialize, Serialize};

/// Requested screen position for a toast
///
/// `Smart` defers to the renderer's positioning heuristics; the queue never
/// interprets this field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPosition {
    Top,
    Bottom,
    Center,
    #[default]
    Smart,
}
