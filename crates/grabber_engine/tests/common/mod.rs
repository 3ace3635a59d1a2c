#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use grabber_engine::{
    EngineEvent, FetchSettings, ProgressSink, ReqwestTransport, SiteEndpoints,
};
use wiremock::MockServer;

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn endpoints(server: &MockServer) -> SiteEndpoints {
    SiteEndpoints {
        mirror_base: server.uri(),
        portal_base_template: format!("{}/{{name}}/android", server.uri()),
        portal_download_base: format!("{}/dwn/", server.uri()),
    }
}

pub fn transport() -> ReqwestTransport {
    ReqwestTransport::new(FetchSettings::default()).expect("client builds")
}

pub fn html(body: &str) -> String {
    format!("<html><head><title>t</title></head><body>{body}</body></html>")
}
