use crate::handler::QaHandler;

pub struct AppState {
    pub handler: QaHandler,
}
