//! Class stylesheets shipped with each template.
//!
//! Declarations use the subset of CSS the export layout understands:
//! `font-size`/`margin-*`/`padding` in pt, `font-weight`, `font-style`,
//! `font-family`, `color`, `background-color`, `text-align`,
//! `text-transform`, `display:flex`, `justify-content`, `width` in % and
//! `border-bottom` on rules.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub class: &'static str,
    pub declarations: &'static str,
}

/// Ordered class rules. Later rules win when an element has several classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Stylesheet(pub &'static [Rule]);

impl Stylesheet {
    pub fn get(&self, class: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|r| r.class == class)
            .map(|r| r.declarations)
    }

    /// Declarations for a `class` attribute value, joined in stylesheet order.
    pub fn resolve<'a>(&self, classes: impl Iterator<Item = &'a str>) -> String {
        let wanted: Vec<&str> = classes.collect();
        self.0
            .iter()
            .filter(|r| wanted.contains(&r.class))
            .map(|r| r.declarations.trim().trim_end_matches(';'))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|r| format!(".{} {{ {} }}", r.class, r.declarations))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Shorthand for writing template stylesheets.
macro_rules! stylesheet {
    ($($class:literal => $decls:literal),* $(,)?) => {
        $crate::render::style::Stylesheet(&[
            $($crate::render::style::Rule { class: $class, declarations: $decls }),*
        ])
    };
}

pub(crate) use stylesheet;
