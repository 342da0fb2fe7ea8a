use std::{
    cell::{OnceCell, RefCell},
    rc::Rc,
};

use i_slint_backend_winit::winit::window::WindowAttributes;

type AttributesChange = Rc<dyn Fn(WindowAttributes) -> WindowAttributes>;

thread_local! {
    pub(crate) static WINDOW_SETTINGS: OnceCell<WindowCreationSettings> = OnceCell::new();
}

pub fn get_window_creation_settings() -> WindowCreationSettings {
    WINDOW_SETTINGS.with(|s| s.get_or_init(WindowCreationSettings::new).clone())
}

/// Adjustments applied to the winit attributes of every window created on this thread.
/// Defaults apply to all windows, scoped changes (see [WindowCreationSettings::change])
/// only until their guard is dropped.
pub struct WindowCreationSettings {
    inner: Rc<RefCell<InnerCreationSettings>>,
}

struct InnerCreationSettings {
    default_change: AttributesChange,
    current_change: Option<AttributesChange>,
}

impl WindowCreationSettings {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(InnerCreationSettings {
                default_change: Rc::new(|attr: WindowAttributes| {
                    attr.with_decorations(false)
                }),
                current_change: None,
            })),
        }
    }

    pub fn change(
        &self,
        change: impl Fn(WindowAttributes) -> WindowAttributes + 'static,
    ) -> SettingsChangedGuard {
        let mut inner = self.inner.borrow_mut();
        let guard = SettingsChangedGuard {
            settings: self.clone(),
            old_change: inner.current_change.take(),
        };
        inner.current_change = Some(Rc::new(change));
        guard
    }

    /// Applies the defaults and the current scoped change to [attr].
    pub fn apply(&self, attr: WindowAttributes) -> WindowAttributes {
        let (default_change, current_change) = {
            let inner = self.inner.borrow();
            (inner.default_change.clone(), inner.current_change.clone())
        };
        let attr = default_change(attr);
        match current_change {
            Some(change) => change(attr),
            None => attr,
        }
    }
}

impl Clone for WindowCreationSettings {
    fn clone(&self) -> Self {
        WindowCreationSettings {
            inner: self.inner.clone(),
        }
    }
}

/// A guard to revert changes made with [WindowCreationSettings::change].
/// If this gets dropped, the scoped change is replaced by the previous one.
pub struct SettingsChangedGuard {
    settings: WindowCreationSettings,
    old_change: Option<AttributesChange>,
}

impl Drop for SettingsChangedGuard {
    fn drop(&mut self) {
        // Borrowing may only fail if the guard is being dropped inside of an attribute
        // change callback, which should not happen anyway.
        if let Ok(mut inner) = self.settings.inner.try_borrow_mut() {
            inner.current_change = self.old_change.take();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn guard_reverts_change() {
        let settings = WindowCreationSettings::new();
        {
            let _guard = settings.change(|attr| attr.with_resizable(false));
            assert!(!settings.apply(WindowAttributes::default()).resizable);
        }
        let attr = settings.apply(WindowAttributes::default());
        assert!(attr.resizable);
        assert!(!attr.decorations, "Defaults must stay applied");
    }

    #[test]
    fn nested_changes_restore_in_order() {
        let settings = WindowCreationSettings::new();
        let _outer = settings.change(|attr| attr.with_title("outer"));
        {
            let _inner = settings.change(|attr| attr.with_title("inner"));
            assert_eq!(settings.apply(WindowAttributes::default()).title, "inner");
        }
        assert_eq!(settings.apply(WindowAttributes::default()).title, "outer");
    }
}
