use crate::services::shorturl::ShortUrlService;

pub struct AppState {
    pub service: ShortUrlService,
}
