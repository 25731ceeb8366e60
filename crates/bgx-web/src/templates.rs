use askama::Template;

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "entities.html")]
pub struct EntitiesTemplate {
    pub filename: String,
    pub entries: Vec<(&'static str, String)>,
    pub countries: Vec<(&'static str, String)>,
    pub warnings: Vec<String>,
}
