use typerig_core::{Diagnostic, Diagnostics};

/// A computed value together with the non-fatal findings met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Blend<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Blend<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Blend<U> {
        Blend {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Move the diagnostics into `sink`, returning the bare value.
    pub fn drain_into(self, sink: &mut Diagnostics) -> T {
        sink.merge(self.diagnostics);
        self.value
    }

    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has(&self, matches: impl Fn(&Diagnostic) -> bool) -> bool {
        self.diagnostics.iter().any(matches)
    }
}
