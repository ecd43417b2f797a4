use crate::error::NavigationError;
use crate::host::{EditorHost, HostError};

/// Translates absolute char offsets into (line, column) using the view's text.
pub struct PositionResolver<'h, H: EditorHost> {
    host: &'h H,
}

impl<'h, H: EditorHost> PositionResolver<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// `offset` may equal the text length (end of document); anything past it
    /// fails without asking the host to translate.
    pub fn to_line_column(&self, view: &H::View, offset: usize) -> Result<(usize, usize), NavigationError> {
        let fail = |source| NavigationError::PositionResolution { offset, source };

        let length = self.host.text_length(view).map_err(fail)?;
        if offset > length {
            return Err(fail(HostError::OffsetOutOfRange { offset, length }));
        }

        self.host.line_and_column(view, offset).map_err(fail)
    }
}
