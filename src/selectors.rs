//! CSS selectors for the course directory and both profile layouts.
//!
//! All of these are literals, so they're parsed once on first use.

use std::sync::LazyLock;

use scraper::Selector;

fn parse(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

macro_rules! selectors {
    ($($(#[$meta:meta])* $name:ident = $css:literal;)*) => {
        $(
            $(#[$meta])*
            pub static $name: LazyLock<Selector> = LazyLock::new(|| parse($css));
        )*
    };
}

selectors! {
    // Course directory.
    /// Present only when the directory has no such course.
    COURSE_NOT_FOUND = "#course-notfound";
    OFFERING_ROW = "tr";
    AVAILABLE_PROFILE_LINK = "a.profile-available";

    // Legacy archive.
    TABLE = "table";
    TABLE_BODY_ROW = "tbody tr";
    TABLE_CELL = "td";

    // Current profile site.
    ASSESSMENT_DETAILS = "#assessment-details";
    ASSESSMENT_HEADING = "h3";
    DEFINITION_LIST = "dl";
    DEFINITION_TERM = "dt";
    DEFINITION_VALUE = "dd";
    COLLAPSIBLE = "div.collapsible";
    ICON_LIST = "ul.icon-list";
    PARAGRAPH = "p";
    SUB_HEADING = "h4, h5, h6";
    COURSE_HEADING = "h1";
    COURSE_OVERVIEW = "#course-overview";
}
