// src/cv/handlers/mod.rs

mod info;
mod upload;

pub use info::{get_cv, list_cvs, update_cv_info};
pub use upload::upload_cv;
