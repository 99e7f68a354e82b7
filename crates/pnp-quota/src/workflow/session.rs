use crate::{log::CallLogger, ops::send::Response, types::KeyVersionInfo};

///
/// Session
///
/// Per-call context handed to downstream handling. Owns the validated
/// request, the response sink and the resolved key version; it lives for
/// exactly one inbound call and is never shared.
///

#[derive(Debug)]
pub struct Session<R> {
    request: R,
    response: Response,
    key_version_info: KeyVersionInfo,
}

impl<R> Session<R> {
    pub const fn new(request: R, response: Response, key_version_info: KeyVersionInfo) -> Self {
        Self {
            request,
            response,
            key_version_info,
        }
    }

    pub const fn request(&self) -> &R {
        &self.request
    }

    pub const fn key_version_info(&self) -> &KeyVersionInfo {
        &self.key_version_info
    }

    pub const fn response(&self) -> &Response {
        &self.response
    }

    pub const fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub const fn logger(&self) -> &CallLogger {
        self.response.logger()
    }

    pub fn into_parts(self) -> (R, Response, KeyVersionInfo) {
        (self.request, self.response, self.key_version_info)
    }
}
