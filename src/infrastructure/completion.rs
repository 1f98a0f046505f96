//! Keyword-based CSS value completion over a virtual stylesheet.

use crate::domain::document::{Position, Range};
use crate::domain::virtual_document::VirtualDocument;
use crate::ports::{CompletionItem, CssCompletionService, TextEdit};

/// Values valid for every property.
const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "revert", "revert-layer", "unset"];

const PROPERTY_KEYWORDS: &[(&str, &[&str])] = &[
    ("align-content", &["center", "flex-end", "flex-start", "normal", "space-around", "space-between", "space-evenly", "stretch"]),
    ("align-items", &["baseline", "center", "flex-end", "flex-start", "normal", "stretch"]),
    ("align-self", &["auto", "baseline", "center", "flex-end", "flex-start", "normal", "stretch"]),
    ("animation-direction", &["alternate", "alternate-reverse", "normal", "reverse"]),
    ("animation-fill-mode", &["backwards", "both", "forwards", "none"]),
    ("animation-timing-function", &["ease", "ease-in", "ease-in-out", "ease-out", "linear", "step-end", "step-start"]),
    ("border-style", &["dashed", "dotted", "double", "groove", "hidden", "inset", "none", "outset", "ridge", "solid"]),
    ("box-sizing", &["border-box", "content-box"]),
    ("clear", &["both", "left", "none", "right"]),
    ("cursor", &["auto", "default", "grab", "help", "move", "not-allowed", "pointer", "text", "wait"]),
    ("display", &["block", "contents", "flex", "grid", "inline", "inline-block", "inline-flex", "inline-grid", "none", "table"]),
    ("flex-direction", &["column", "column-reverse", "row", "row-reverse"]),
    ("flex-wrap", &["nowrap", "wrap", "wrap-reverse"]),
    ("float", &["left", "none", "right"]),
    ("font-style", &["italic", "normal", "oblique"]),
    ("font-weight", &["bold", "bolder", "lighter", "normal"]),
    ("justify-content", &["center", "flex-end", "flex-start", "space-around", "space-between", "space-evenly", "stretch"]),
    ("object-fit", &["contain", "cover", "fill", "none", "scale-down"]),
    ("overflow", &["auto", "clip", "hidden", "scroll", "visible"]),
    ("pointer-events", &["auto", "none"]),
    ("position", &["absolute", "fixed", "relative", "static", "sticky"]),
    ("text-align", &["center", "end", "justify", "left", "right", "start"]),
    ("text-transform", &["capitalize", "lowercase", "none", "uppercase"]),
    ("transition-timing-function", &["ease", "ease-in", "ease-in-out", "ease-out", "linear", "step-end", "step-start"]),
    ("user-select", &["all", "auto", "none", "text"]),
    ("vertical-align", &["baseline", "bottom", "middle", "sub", "super", "text-bottom", "text-top", "top"]),
    ("visibility", &["collapse", "hidden", "visible"]),
    ("white-space", &["break-spaces", "normal", "nowrap", "pre", "pre-line", "pre-wrap"]),
    ("word-break", &["break-all", "keep-all", "normal"]),
];

const COLOR_PROPERTIES: &[&str] = &[
    "accent-color",
    "background",
    "background-color",
    "border-bottom-color",
    "border-color",
    "border-left-color",
    "border-right-color",
    "border-top-color",
    "caret-color",
    "color",
    "column-rule-color",
    "fill",
    "outline-color",
    "stroke",
    "text-decoration-color",
];

const COLOR_KEYWORDS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "currentcolor", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkkhaki", "darkmagenta",
    "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen",
    "darkslateblue", "darkslategray", "darkturquoise", "darkviolet", "deeppink", "deepskyblue",
    "dimgray", "dodgerblue", "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro",
    "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow", "honeydew", "hotpink",
    "indianred", "indigo", "ivory", "khaki", "lavender", "lavenderblush", "lawngreen",
    "lemonchiffon", "lightblue", "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray",
    "lightgreen", "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon",
    "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue",
    "mintcream", "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab",
    "orange", "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise",
    "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple",
    "rebeccapurple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown",
    "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue", "slategray", "snow",
    "springgreen", "steelblue", "tan", "teal", "thistle", "tomato", "transparent", "turquoise",
    "violet", "wheat", "white", "whitesmoke", "yellow", "yellowgreen",
];

/// Completes the word under the cursor from per-property keyword tables.
/// Custom properties accept anything, so they are offered every table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCompletionService;

impl KeywordCompletionService {
    pub fn new() -> Self {
        Self
    }

    fn candidates(property: &str) -> Vec<(&'static str, &'static str)> {
        let is_custom = property.starts_with("--");
        let mut out: Vec<(&'static str, &'static str)> = Vec::new();
        for (name, keywords) in PROPERTY_KEYWORDS {
            if is_custom || *name == property {
                out.extend(keywords.iter().map(|k| (*k, "Value")));
            }
        }
        if is_custom || COLOR_PROPERTIES.contains(&property) {
            out.extend(COLOR_KEYWORDS.iter().map(|k| (*k, "Color")));
        }
        out.extend(GLOBAL_KEYWORDS.iter().map(|k| (*k, "Keyword")));

        let mut seen = std::collections::HashSet::new();
        out.retain(|(label, _)| seen.insert(*label));
        out
    }
}

impl CssCompletionService for KeywordCompletionService {
    fn complete(&self, document: &VirtualDocument, position: Position) -> Vec<CompletionItem> {
        let text = document.text();
        let offset = document.offset_at(position).min(text.len());
        // Offset 0 is the opening quote in source; 1 is the first value char.
        let value_start = document.map_offset(1);
        if offset < value_start || !text.is_char_boundary(offset) {
            return Vec::new();
        }

        let word_start = text[value_start..offset]
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .map(|i| value_start + i + 1)
            .unwrap_or(value_start);
        let prefix = text[word_start..offset].to_ascii_lowercase();
        let range = Range::new(document.position_at(word_start), position);

        Self::candidates(document.property())
            .into_iter()
            .filter(|(label, _)| label.starts_with(prefix.as_str()))
            .map(|(label, kind)| CompletionItem {
                label: label.to_string(),
                kind: Some(kind.to_string()),
                text_edit: Some(TextEdit { range, new_text: label.to_string() }),
            })
            .collect()
    }
}
