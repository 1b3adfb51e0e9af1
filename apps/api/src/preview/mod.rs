// Preview synthesis: normalize collected form values into a draft, compose the
// structured preview, and project it to escaped HTML.

pub mod composer;
pub mod html;
pub mod model;

pub use composer::{build_draft, compose};
pub use html::{escape_html, render_html};
pub use model::Preview;
