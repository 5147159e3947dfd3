// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Call-site capture
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolves the source location of a log call to the first frame outside this
// crate. Capture happens at macro-expansion time in the caller's own frame,
// so the appender's internal call chain can never leak into a location and
// no stack walk is needed at runtime. Resolution must stay on the calling
// thread: deferring it would observe the wrong frame.

use crate::record::CallSite;

/// Capture the [`CallSite`] of the invoking source line.
///
/// Expands to a `CallSite` carrying the enclosing module path, the fully
/// qualified name of the enclosing function, and the file/line of the
/// invocation itself:
///
/// ```
/// use mmaplog_appender::call_site;
///
/// let site = call_site!();
/// assert!(site.line > 0);
/// ```
#[macro_export]
macro_rules! call_site {
    () => {{
        // Nested probe: its type name is the enclosing function's qualified
        // path plus a trailing "::f".
        fn f() {}
        $crate::record::CallSite {
            module_path: ::core::module_path!(),
            function: $crate::caller::enclosing_function(::core::any::type_name_of_val(&f)),
            file: ::core::file!(),
            line: ::core::line!(),
        }
    }};
}

/// Strip the probe suffix from a nested-function type name, leaving the
/// qualified name of the enclosing function.
#[doc(hidden)]
pub fn enclosing_function(probe: &'static str) -> &'static str {
    probe.strip_suffix("::f").unwrap_or(probe)
}

/// Capture the caller's file and line without a macro.
///
/// Useful behind wrapper functions: annotate the wrappers with
/// `#[track_caller]` and the location propagates through them to the first
/// unannotated caller. The function name is left unresolved, so rendered
/// locations fall back to the module-less `(file:line)` form.
#[track_caller]
pub fn here() -> CallSite {
    let location = std::panic::Location::caller();
    CallSite {
        module_path: "",
        function: "",
        file: location.file(),
        line: location.line(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_site_captures_enclosing_function() {
        let line = line!() + 1;
        let site = call_site!();
        assert_eq!(site.line, line);
        assert_eq!(site.module_path, "mmaplog_appender::caller::tests");
        assert_eq!(
            site.function,
            "mmaplog_appender::caller::tests::test_call_site_captures_enclosing_function"
        );
        assert_eq!(site.file_name(), "caller.rs");
    }

    #[test]
    fn test_enclosing_function_strips_probe() {
        assert_eq!(enclosing_function("a::b::c::f"), "a::b::c");
        assert_eq!(enclosing_function("no_probe"), "no_probe");
    }

    #[test]
    fn test_here_reports_this_file() {
        let line = line!() + 1;
        let site = here();
        assert_eq!(site.line, line);
        assert_eq!(site.file_name(), "caller.rs");
        assert!(site.function.is_empty());
    }

    #[test]
    fn test_track_caller_propagates_through_wrappers() {
        #[track_caller]
        fn wrapper() -> CallSite {
            here()
        }

        let line = line!() + 1;
        let site = wrapper();
        assert_eq!(site.line, line);
    }
}
