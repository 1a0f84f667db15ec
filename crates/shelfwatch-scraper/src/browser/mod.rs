//! Chromium session management over the DevTools protocol.
//!
//! [`session::BrowserSession`] owns the browser process, its event loop, and
//! one page; [`interceptor::ResponseInterceptor`] attaches passive network
//! listeners to that page and buffers matching response bodies.

mod interceptor;
mod session;

pub use interceptor::{CapturedResponse, ResponseInterceptor};
pub use session::BrowserSession;
