use std::path::Path;

use crate::error::{NavigationError, NavigationStep};
use crate::host::{EditorHost, HostError, ViewKind};
use crate::navigation::location::Location;
use crate::navigation::position::PositionResolver;
use crate::navigation::view::ViewResolver;
use crate::util::log::log_to_file;

/// Progress of a single navigation. `Scrolled` is the only successful end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Start,
    Opened,
    Normalized,
    Shown,
    Positioned,
    Scrolled,
    Failed,
}

/// Result of a completed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub line: usize,
    pub column: usize,
    pub state: NavigationState,
}

pub struct Navigator<'h, H: EditorHost> {
    host: &'h mut H,
    minimum_visible_lines: usize,
}

impl<'h, H: EditorHost> Navigator<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self { host, minimum_visible_lines: 1 }
    }

    /// Lines kept visible around the caret line; never less than one.
    pub fn with_minimum_visible_lines(mut self, lines: usize) -> Self {
        self.minimum_visible_lines = lines.max(1);
        self
    }

    /// Open `path` without moving the caret.
    pub fn open_document(&mut self, path: &Path, kind: &ViewKind) -> Result<(H::View, H::Frame), NavigationError> {
        ViewResolver::new(&mut *self.host).resolve(path, kind)
    }

    /// Open `path`, show its frame, place the caret at `location` and scroll it
    /// into view. Stops at the first failing step.
    pub fn navigate_to(
        &mut self,
        path: &Path,
        kind: &ViewKind,
        location: Location,
    ) -> Result<NavigationOutcome, NavigationError> {
        let mut state = NavigationState::Start;
        let result = self.run(path, kind, location, &mut state);

        match &result {
            Ok(outcome) => log_to_file(&format!(
                "Navigated to {}:{}:{}",
                path.display(),
                outcome.line,
                outcome.column
            )),
            Err(err) => {
                log_to_file(&format!(
                    "Navigation to {} failed at {} step: {}",
                    path.display(),
                    err.step(),
                    err
                ));
                advance(&mut state, NavigationState::Failed);
            }
        }

        result
    }

    fn run(
        &mut self,
        path: &Path,
        kind: &ViewKind,
        location: Location,
        state: &mut NavigationState,
    ) -> Result<NavigationOutcome, NavigationError> {
        let (view, frame) = self.open_document(path, kind)?;
        advance(state, NavigationState::Opened);

        let (line, column) = match location {
            Location::LineColumn { line, column } => (line, column),
            Location::Offset(offset) => PositionResolver::new(&*self.host).to_line_column(&view, offset)?,
        };
        advance(state, NavigationState::Normalized);

        self.host.show_frame(&frame).map_err(host_failure(NavigationStep::Show))?;
        advance(state, NavigationState::Shown);

        self.host
            .set_caret_position(&view, line, column)
            .map_err(host_failure(NavigationStep::SetCaret))?;
        advance(state, NavigationState::Positioned);

        self.host
            .center_on_line(&view, line, self.minimum_visible_lines)
            .map_err(host_failure(NavigationStep::Center))?;
        advance(state, NavigationState::Scrolled);

        Ok(NavigationOutcome { line, column, state: *state })
    }
}

fn advance(state: &mut NavigationState, next: NavigationState) {
    log_to_file(&format!("[navigate] {:?} -> {:?}", state, next));
    *state = next;
}

fn host_failure(step: NavigationStep) -> impl FnOnce(HostError) -> NavigationError {
    move |source| NavigationError::HostOperation { step, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::headless::HeadlessHost;
    use std::path::PathBuf;

    fn host_with(text: &str) -> (HeadlessHost, PathBuf) {
        let path = PathBuf::from("/virtual/foo.txt");
        let mut host = HeadlessHost::default();
        host.set_buffer_text(&path, text);
        (host, path)
    }

    #[test]
    fn explicit_location_lands_and_is_visible() {
        let (mut host, path) = host_with("zero\none\ntwo\nthree is long\nfour");

        let outcome = Navigator::new(&mut host)
            .navigate_to(&path, &ViewKind::Default, Location::line_column(3, 5))
            .unwrap();
        assert_eq!((outcome.line, outcome.column), (3, 5));
        assert_eq!(outcome.state, NavigationState::Scrolled);

        let (view, frame) = host.open_document(&path, &ViewKind::Default).unwrap();
        assert_eq!(host.caret(view), Some((3, 5)));
        assert!(host.is_shown(frame));
        assert!(host.visible_lines(view).unwrap().contains(&3));
    }

    #[test]
    fn offset_matches_equivalent_line_column() {
        let text = "first line\nsecond line is here\nthird";
        let (mut by_offset, path) = host_with(text);
        let (mut by_position, _) = host_with(text);

        let a = Navigator::new(&mut by_offset)
            .navigate_to(&path, &ViewKind::Default, Location::Offset(21))
            .unwrap();
        let b = Navigator::new(&mut by_position)
            .navigate_to(&path, &ViewKind::Default, Location::line_column(1, 10))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_path_is_rejected_before_opening() {
        let (mut host, _) = host_with("abc");
        let err = Navigator::new(&mut host)
            .navigate_to(Path::new(""), &ViewKind::Default, Location::Offset(0))
            .unwrap_err();
        assert!(matches!(err, NavigationError::InvalidArgument(_)));
        assert_eq!(err.step(), NavigationStep::Validate);
        assert_eq!(host.active_frame(), None);
    }

    #[test]
    fn caret_outside_document_reports_set_caret_step() {
        let (mut host, path) = host_with("abc");
        let err = Navigator::new(&mut host)
            .navigate_to(&path, &ViewKind::Default, Location::line_column(4, 0))
            .unwrap_err();
        assert_eq!(err.step(), NavigationStep::SetCaret);
        assert_eq!(err.host_code(), Some(5));
    }

    #[test]
    fn minimum_visible_lines_is_at_least_one() {
        let (mut host, path) = host_with("a\nb");
        let outcome = Navigator::new(&mut host)
            .with_minimum_visible_lines(0)
            .navigate_to(&path, &ViewKind::Default, Location::line_column(1, 1))
            .unwrap();
        assert_eq!(outcome.state, NavigationState::Scrolled);
    }
}
