mod scene_layout;

pub use scene_layout::SceneLayout;
