pub mod planet_list;
pub mod scene_tree;
pub mod status_bar;
pub mod viewport;
