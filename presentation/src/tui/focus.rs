//! Focus state and Tab navigation order.

use super::panel::PanelId;

/// Panels reachable with Tab, in order. The status bar is never focusable.
pub static NAVIGATION_ORDER: [PanelId; 6] = [
    PanelId::Input,
    PanelId::Conversation,
    PanelId::Debug,
    PanelId::TextViewer,
    PanelId::DiffViewer,
    PanelId::Left,
];

/// Which panel owns keyboard input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    current: Option<PanelId>,
}

impl FocusState {
    pub fn current(&self) -> Option<&PanelId> {
        self.current.as_ref()
    }

    pub fn is(&self, id: &PanelId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Returns the previous holder.
    pub(crate) fn set(&mut self, id: Option<PanelId>) -> Option<PanelId> {
        std::mem::replace(&mut self.current, id)
    }
}

/// One completed focus transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusChange {
    pub lost: Option<PanelId>,
    pub gained: PanelId,
}

/// Next navigable panel after `current`, wrapping around.
///
/// Starts from the top of the order when `current` is not part of it.
pub fn next_in_order(
    current: Option<&PanelId>,
    navigable: impl Fn(&PanelId) -> bool,
) -> Option<PanelId> {
    let len = NAVIGATION_ORDER.len();
    let start = current
        .and_then(|c| NAVIGATION_ORDER.iter().position(|id| id == c))
        .map_or(0, |i| i + 1);

    (0..len)
        .map(|offset| &NAVIGATION_ORDER[(start + offset) % len])
        .find(|id| navigable(id))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_skips_non_navigable_and_wraps() {
        let navigable = |id: &PanelId| matches!(id, PanelId::Input | PanelId::Conversation);
        assert_eq!(
            next_in_order(Some(&PanelId::Input), navigable),
            Some(PanelId::Conversation)
        );
        assert_eq!(
            next_in_order(Some(&PanelId::Conversation), navigable),
            Some(PanelId::Input)
        );
    }

    #[test]
    fn test_next_from_outside_order_starts_at_top() {
        let all = |_: &PanelId| true;
        assert_eq!(next_in_order(None, all), Some(PanelId::Input));
        assert_eq!(
            next_in_order(Some(&PanelId::Status), all),
            Some(PanelId::Input)
        );
    }

    #[test]
    fn test_next_returns_none_when_nothing_navigable() {
        assert_eq!(next_in_order(Some(&PanelId::Input), |_| false), None);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut focus = FocusState::default();
        assert_eq!(focus.set(Some(PanelId::Input)), None);
        assert_eq!(focus.set(Some(PanelId::Debug)), Some(PanelId::Input));
        assert!(focus.is(&PanelId::Debug));
    }
}
