//! Nodes the targeting machine owns and how they are drawn.

use zapper_dom::{BoundingBox, Document, DomError, NodeId, ViewportInfo};

pub const HIGHLIGHT_ID: &str = "zap-hover-overlay";
pub const TOOLTIP_ID: &str = "zap-info-box";
pub const INDICATOR_ID: &str = "zap-mode-indicator";
pub const STYLE_ID: &str = "zap-mode-style";

/// Body attribute marking targeting mode as active.
pub const MODE_ATTR: &str = "data-zap-mode";

pub const INDICATOR_TEXT: &str = "\u{26a1} Zap Mode Active - Click elements to zap, ESC to exit";
pub const TOOLTIP_HINT: &str = "Click to zap";

const OWN_IDS: [&str; 3] = [HIGHLIGHT_ID, TOOLTIP_ID, INDICATOR_ID];

/// Disables native interaction on links and buttons while the body carries
/// the mode marker.
const SUPPRESS_CSS: &str = r#"body[data-zap-mode="true"] a,
body[data-zap-mode="true"] button,
body[data-zap-mode="true"] input[type="button"],
body[data-zap-mode="true"] input[type="submit"],
body[data-zap-mode="true"] [role="button"],
body[data-zap-mode="true"] [onclick],
body[data-zap-mode="true"] [href]:not([href=""]) {
  pointer-events: none !important;
  cursor: crosshair !important;
}
body[data-zap-mode="true"] {
  cursor: crosshair !important;
}"#;

const HIGHLIGHT_STYLE: &str = "position: fixed; pointer-events: none; z-index: 999999; \
     border: 2px solid #6366f1; background: rgba(99, 102, 241, 0.1); \
     transition: all 0.1s ease-out; box-shadow: 0 0 0 1px rgba(99, 102, 241, 0.3); \
     display: none";

const TOOLTIP_STYLE: &str = "position: fixed; pointer-events: none; z-index: 1000000; \
     background: #1f2937; color: white; padding: 8px 12px; border-radius: 6px; \
     font-size: 12px; max-width: 300px; word-wrap: break-word; display: none";

const INDICATOR_STYLE: &str = "position: fixed; top: 10px; right: 10px; background: #6366f1; \
     color: white; padding: 8px 16px; border-radius: 6px; font-size: 13px; \
     z-index: 999999; pointer-events: none";

// Tooltip box model, in pixels.
const TOOLTIP_PAD_X: f64 = 12.0;
const TOOLTIP_PAD_Y: f64 = 8.0;
const TOOLTIP_MAX_WIDTH: f64 = 300.0;
const CHAR_WIDTH: f64 = 7.0;
const LABEL_LINE: f64 = 16.0;
const LABEL_MARGIN: f64 = 4.0;
const TEXT_LINE: f64 = 15.0;
const HINT_LINE: f64 = 15.0;
const HINT_MARGIN: f64 = 4.0;

const INDICATOR_WIDTH: f64 = 380.0;
const INDICATOR_HEIGHT: f64 = 34.0;

/// Where the tooltip ended up relative to the hovered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPlacement {
    Above,
    Below,
}

/// The node is one of the overlay nodes or lives inside one.
pub fn is_own_node(doc: &Document, node: NodeId) -> bool {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .any(|n| doc.attribute(n, "id").is_some_and(|id| OWN_IDS.contains(&id)))
}

/// Links, buttons and anything with a click handler or a non-empty `href`.
pub fn is_interactive(doc: &Document, node: NodeId) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };
    matches!(el.tag.as_str(), "a" | "button")
        || el.click_handler
        || el.attribute("href").is_some_and(|h| !h.is_empty())
}

fn set_styles(doc: &mut Document, node: NodeId, styles: &[(&str, String)]) -> Result<(), DomError> {
    for (property, value) in styles {
        doc.set_style(node, property, value)?;
    }
    Ok(())
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Return the suppression style node, creating it in the head on first use.
pub fn ensure_style(doc: &mut Document, known: Option<NodeId>) -> Result<NodeId, DomError> {
    if let Some(node) = known.filter(|n| doc.is_connected(*n)) {
        return Ok(node);
    }
    if let Some(node) = doc.get_element_by_id(STYLE_ID) {
        return Ok(node);
    }
    let style = doc.create_element("style");
    doc.set_attribute(style, "id", STYLE_ID)?;
    doc.set_text_content(style, SUPPRESS_CSS)?;
    let head = doc.head();
    doc.append_child(head, style)?;
    Ok(style)
}

fn create_owned(doc: &mut Document, id: &str, style: &str) -> Result<NodeId, DomError> {
    let node = doc.create_element("div");
    doc.set_attribute(node, "id", id)?;
    doc.set_attribute(node, "style", style)?;
    let body = doc.body();
    doc.append_child(body, node)?;
    Ok(node)
}

pub fn create_highlight(doc: &mut Document) -> Result<NodeId, DomError> {
    create_owned(doc, HIGHLIGHT_ID, HIGHLIGHT_STYLE)
}

pub fn create_tooltip(doc: &mut Document) -> Result<NodeId, DomError> {
    create_owned(doc, TOOLTIP_ID, TOOLTIP_STYLE)
}

pub fn create_indicator(doc: &mut Document) -> Result<NodeId, DomError> {
    let node = create_owned(doc, INDICATOR_ID, INDICATOR_STYLE)?;
    doc.set_text_content(node, INDICATOR_TEXT)?;
    let viewport = doc.viewport().clone();
    let rect = BoundingBox::new(
        (viewport.width - 10.0 - INDICATOR_WIDTH).max(0.0),
        10.0,
        INDICATOR_WIDTH,
        INDICATOR_HEIGHT,
    );
    doc.set_rect(node, rect)?;
    Ok(node)
}

/// Remove an owned node if the page has not already removed it.
pub fn discard(doc: &mut Document, node: NodeId) {
    if doc.exists(node) {
        let _ = doc.remove(node);
    }
}

/// Cover `rect` with the highlight box, in page coordinates.
pub fn place_highlight(
    doc: &mut Document,
    highlight: NodeId,
    rect: BoundingBox,
    viewport: &ViewportInfo,
) -> Result<(), DomError> {
    let width = rect.width.max(1.0);
    let height = rect.height.max(1.0);
    set_styles(
        doc,
        highlight,
        &[
            ("display", "block".to_string()),
            ("left", px(rect.left() + viewport.scroll_x)),
            ("top", px(rect.top() + viewport.scroll_y)),
            ("width", px(width)),
            ("height", px(height)),
        ],
    )?;
    doc.set_rect(highlight, BoundingBox::new(rect.x, rect.y, width, height))
}

pub fn hide(doc: &mut Document, node: NodeId) {
    if doc.exists(node) {
        let _ = doc.set_style(node, "display", "none");
    }
}

/// `tag#id.class1.class2.class3`, raw values, at most `max_classes` classes.
pub fn describe(doc: &Document, element: NodeId, max_classes: usize) -> String {
    let Some(el) = doc.element(element) else {
        return "element".to_string();
    };
    let mut label = el.tag.clone();
    if let Some(id) = el.id() {
        label.push('#');
        label.push_str(id);
    }
    let classes: Vec<&str> = el.classes().take(max_classes).collect();
    if !classes.is_empty() {
        label.push('.');
        label.push_str(&classes.join("."));
    }
    label
}

/// Trimmed text content cut to `max_chars`, with `...` when cut.
pub fn snippet(doc: &Document, element: NodeId, max_chars: usize) -> Option<String> {
    let text = doc.text_content(element);
    let text = text.trim();
    if text.is_empty() || max_chars == 0 {
        return None;
    }
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    Some(out)
}

fn wrapped_lines(chars: usize, content_width: f64) -> f64 {
    let per_line = (content_width / CHAR_WIDTH).floor().max(1.0);
    (chars as f64 / per_line).ceil().max(1.0)
}

/// Fill the tooltip and return its rendered `(width, height)`.
pub fn render_tooltip(
    doc: &mut Document,
    tooltip: NodeId,
    label: &str,
    text: Option<&str>,
) -> Result<(f64, f64), DomError> {
    doc.clear_children(tooltip)?;
    let mut lines: Vec<(&str, &str)> = vec![("zap-info-label", label)];
    if let Some(text) = text {
        lines.push(("zap-info-text", text));
    }
    lines.push(("zap-info-hint", TOOLTIP_HINT));
    for (class, content) in &lines {
        let line = doc.create_element("div");
        doc.set_attribute(line, "class", class)?;
        doc.set_text_content(line, content)?;
        doc.append_child(tooltip, line)?;
    }

    let widest = lines.iter().map(|(_, c)| c.chars().count()).max().unwrap_or(0);
    let width = (widest as f64 * CHAR_WIDTH + 2.0 * TOOLTIP_PAD_X).min(TOOLTIP_MAX_WIDTH);
    let content_width = width - 2.0 * TOOLTIP_PAD_X;

    let mut height = 2.0 * TOOLTIP_PAD_Y;
    height += wrapped_lines(label.chars().count(), content_width) * LABEL_LINE + LABEL_MARGIN;
    if let Some(text) = text {
        height += wrapped_lines(text.chars().count(), content_width) * TEXT_LINE;
    }
    height += HINT_LINE + HINT_MARGIN;

    doc.set_style(tooltip, "display", "block")?;
    Ok((width, height))
}

/// Put the tooltip above `target` when the space above exceeds its height
/// plus `clearance`, otherwise below. Offsets are page coordinates.
pub fn place_tooltip(
    doc: &mut Document,
    tooltip: NodeId,
    target: BoundingBox,
    size: (f64, f64),
    viewport: &ViewportInfo,
    gap: f64,
    clearance: f64,
) -> Result<TooltipPlacement, DomError> {
    let (width, height) = size;
    let space_above = target.top();
    let (placement, top) = if space_above > height + clearance {
        (TooltipPlacement::Above, target.top() + viewport.scroll_y - height - gap)
    } else {
        (TooltipPlacement::Below, target.bottom() + viewport.scroll_y + gap)
    };
    let left = target.left() + viewport.scroll_x;

    set_styles(doc, tooltip, &[("top", px(top)), ("left", px(left))])?;
    doc.set_rect(
        tooltip,
        BoundingBox::new(left - viewport.scroll_x, top - viewport.scroll_y, width, height),
    )?;
    Ok(placement)
}
