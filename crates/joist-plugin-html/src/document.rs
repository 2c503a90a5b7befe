//! Element templates and document assembly.
//!
//! Each classified kind renders through a fixed template; the grouped
//! results are handed to an assembly strategy that decides the final
//! document markup around them.

use crate::classify::ClassifiedOutputs;

/// The rendered element groups handed to an assembly strategy.
///
/// Stylesheet link tags, inline fragment content, and script tags, one
/// element per line in classification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentElements {
    pub links: String,
    pub divs: String,
    pub scripts: String,
}

impl DocumentElements {
    /// Render classified paths and fragment contents through the fixed
    /// per-kind templates. `fragments` carries the file contents for
    /// `outputs.fragments`, in the same order.
    pub fn render(outputs: &ClassifiedOutputs, fragments: &[String]) -> Self {
        Self {
            links: render_group(&outputs.stylesheets, |path| stylesheet_link(path)),
            divs: render_group(fragments, |content| content.to_string()),
            scripts: render_group(&outputs.scripts, |path| module_script(path)),
        }
    }
}

/// Stylesheet reference element.
pub fn stylesheet_link(path: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{path}">"#)
}

/// Deferred module script element.
pub fn module_script(path: &str) -> String {
    format!(r#"<script type="module" src="{path}" defer></script>"#)
}

fn render_group<F>(items: &[String], template: F) -> String
where
    F: Fn(&str) -> String,
{
    items
        .iter()
        .map(|item| format!("{}\n", template(item)))
        .collect()
}

/// Ready-made full-document assembly: stylesheets in the head, fragment
/// content then scripts in the body.
pub fn default_document(elements: &DocumentElements) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         \x20 <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   {links}\n\
         \x20 </head>\n\
         \x20 <body>\n\
         \x20   {divs}\n\
         \x20   {scripts}\n\
         \x20 </body>\n\
         </html>\n",
        links = elements.links.trim_end(),
        divs = elements.divs.trim_end(),
        scripts = elements.scripts.trim_end(),
    )
}
