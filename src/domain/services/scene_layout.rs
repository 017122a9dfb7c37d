//! Scene Layout Service
//!
//! Pure domain logic for turning a scene request into the relative path
//! under which the scene is stored. Shared by the local and cloud backends.

use crate::domain::entities::SceneRequest;

/// Storage layout of scene assets.
///
/// ```text
/// scenes/<namespace>/<layout>_<style>.usd   layout and style given
/// scenes/<namespace>/layout_<layout>.usd    layout only
/// scenes/<namespace>/default.usd            otherwise
/// ```
pub struct SceneLayout;

impl SceneLayout {
    /// Directory holding every scene namespace.
    pub const SCENES_DIR: &'static str = "scenes";

    /// File name of the scene selected by the request.
    ///
    /// A style without a layout selects the default scene. An id of `0`
    /// counts as given (`0_0.usd`); only an absent id falls through to the
    /// next tier. Loaders that test ids for truthiness would treat `0` as
    /// absent and pick `default.usd` instead.
    pub fn file_name(request: &SceneRequest) -> String {
        match (request.layout_id, request.style_id) {
            (Some(layout), Some(style)) => format!("{}_{}.usd", layout, style),
            (Some(layout), None) => format!("layout_{}.usd", layout),
            _ => "default.usd".to_string(),
        }
    }

    /// `/`-separated path of the scene relative to a storage root.
    ///
    /// # Example
    /// ```
    /// use ngine_assets::domain::services::SceneLayout;
    /// use ngine_assets::SceneRequest;
    ///
    /// let request = SceneRequest::new("kitchen", "k1").layout_id(3).style_id(7);
    /// assert_eq!(SceneLayout::relative_path(&request), "scenes/kitchen/3_7.usd");
    /// ```
    pub fn relative_path(request: &SceneRequest) -> String {
        format!(
            "{}/{}/{}",
            Self::SCENES_DIR,
            request.backend_namespace,
            Self::file_name(request)
        )
    }

    /// `/`-separated path of a catalogue asset relative to a storage root.
    pub fn registry_path(asset_type: &str, source: &str) -> String {
        format!("{}/{}", asset_type, source)
    }
}
