//! Response body renderers.
//!
//! A [`Render`] writes a body and its content type into a [`Response`].
//! [`Context::render`](crate::Context::render) and the `string`/`json`
//! shortcuts are thin wrappers over it, so custom formats plug in by
//! implementing the trait or passing a closure.
//!
//! ```
//! use gweb_core::{Render, Response, Text};
//!
//! let mut resp = Response::new();
//! Text::new("pong").render(&mut resp).unwrap();
//! assert_eq!(resp.text(), "pong");
//! assert_eq!(resp.headers().get("content-type"), Some("text/plain; charset=utf-8"));
//! ```

use serde::Serialize;

use crate::error::RenderError;
use crate::response::Response;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";
pub const APPLICATION_XML: &str = "application/xml; charset=utf-8";

/// Writes a response body.
pub trait Render {
    /// Write the body into `out`, setting its content type.
    fn render(&self, out: &mut Response) -> Result<(), RenderError>;
}

impl<F> Render for F
where
    F: Fn(&mut Response) -> Result<(), RenderError>,
{
    fn render(&self, out: &mut Response) -> Result<(), RenderError> {
        self(out)
    }
}

/// Plain UTF-8 text.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a>(&'a str);

impl<'a> Text<'a> {
    /// Render `text` as `text/plain`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self(text)
    }
}

impl Render for Text<'_> {
    fn render(&self, out: &mut Response) -> Result<(), RenderError> {
        out.set_content_type(TEXT_PLAIN);
        out.write(self.0.as_bytes());
        Ok(())
    }
}

/// A value serialized with `serde_json`.
#[derive(Debug, Clone, Copy)]
pub struct Json<'a, T: ?Sized>(&'a T);

impl<'a, T: Serialize + ?Sized> Json<'a, T> {
    #[must_use]
    pub fn new(value: &'a T) -> Self {
        Self(value)
    }
}

impl<T: Serialize + ?Sized> Render for Json<'_, T> {
    fn render(&self, out: &mut Response) -> Result<(), RenderError> {
        // Encode first so a failure leaves the response untouched.
        let bytes = serde_json::to_vec(self.0)?;
        out.set_content_type(APPLICATION_JSON);
        out.write(&bytes);
        Ok(())
    }
}

/// A value serialized as XML with `quick-xml`.
///
/// Structs become an element named after the type, with one child element
/// per field. Fields renamed with a leading `@` become attributes.
#[derive(Debug, Clone, Copy)]
pub struct Xml<'a, T: ?Sized>(&'a T);

impl<'a, T: Serialize + ?Sized> Xml<'a, T> {
    #[must_use]
    pub fn new(value: &'a T) -> Self {
        Self(value)
    }
}

impl<T: Serialize + ?Sized> Render for Xml<'_, T> {
    fn render(&self, out: &mut Response) -> Result<(), RenderError> {
        let document =
            quick_xml::se::to_string(self.0).map_err(|err| RenderError::Xml(err.to_string()))?;
        out.set_content_type(APPLICATION_XML);
        out.write(document.as_bytes());
        Ok(())
    }
}
