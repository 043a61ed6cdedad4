use askama::Template;
use askama_web::WebTemplate;

use crate::feed::FeedStatus;
use crate::geo::GeoPoint;
use crate::view::ContactTable;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub table: ContactTable,
    pub status: FeedStatus,
    pub threshold: f64,
    pub center: Option<GeoPoint>,
    pub tile_url: String,
    pub attribution: String,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "table.html")]
pub struct TableTemplate {
    pub table: ContactTable,
}
