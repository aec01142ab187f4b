pub mod episode;
pub mod movie;
pub mod season;
pub mod tv_series;
