use super::require_type;
use crate::error::ModelResult;
use crate::model::core::Value;
use crate::model::registry::{names, types};

/// A link to an external resource.
#[derive(Debug)]
pub struct Link<'a> {
    value: &'a mut Value,
}

impl<'a> Link<'a> {
    /// ## Summary
    /// Wraps a `Link` value.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other type.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        Ok(Self {
            value: require_type(value, types::LINK)?,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.value.parent_property()
    }

    string_accessors! {
        href, set_href => names::HREF;
        cid, set_cid => names::CID;
        content_type, set_content_type => names::CONTENT_TYPE;
        rel, set_rel => names::REL;
        display, set_display => names::DISPLAY;
        title, set_title => names::TITLE;
    }

    /// ## Summary
    /// Returns the size in octets.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not an unsigned integer.
    pub fn size(&self) -> ModelResult<Option<u32>> {
        self.value.unsigned_property(names::SIZE)
    }

    /// ## Summary
    /// Sets the size in octets.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the link is not an object.
    pub fn set_size(&mut self, size: u32) -> ModelResult<()> {
        self.value.set_unsigned_property(names::SIZE, size)
    }
}
