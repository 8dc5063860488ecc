pub mod analysis_view;
pub mod api_key_field;
pub mod header;
pub mod loading_indicator;
pub mod upload_area;
