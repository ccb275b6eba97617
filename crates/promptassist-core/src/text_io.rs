//! Prompt text I/O.
//!
//! Chat sites keep the draft prompt in one of three shapes: a form field with
//! a scalar value, a rich editor that stores one `<p>` per line, or a plain
//! editable region. [`PromptInput`] hides the difference; [`adapter_for`]
//! picks the variant once, when the input is bound.

use promptassist_dom::{Document, DomError, EventKind, NodeId};

/// Invisible characters editors use as cursor anchors.
const MARKER_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}', '\u{2060}'];

/// Key sent after a rich-editor write so the editor picks up the change.
const ACK_KEY: &str = "Unidentified";

/// Classes and attributes that identify paragraph-based editors.
const EDITOR_CLASSES: [&str; 2] = ["ProseMirror", "ql-editor"];
const EDITOR_ATTRIBUTES: [&str; 2] = ["data-lexical-editor", "data-slate-editor"];

/// Children of an editable region that render on their own line.
const BLOCK_TAGS: [&str; 5] = ["p", "div", "li", "blockquote", "pre"];

/// How an input stores its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `textarea` / `input`: scalar form value.
    ValueField,
    /// Rich editor with one paragraph per line.
    ParagraphEditor,
    /// Editable region without the paragraph convention.
    EditableRegion,
}

impl InputKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ValueField => "value-field",
            Self::ParagraphEditor => "paragraph-editor",
            Self::EditableRegion => "editable-region",
        }
    }
}

/// Read and write prompt text for one input representation.
pub trait PromptInput: Send + Sync {
    fn kind(&self) -> InputKind;

    /// Current prompt text.
    fn read(&self, doc: &Document, input: NodeId) -> String;

    /// Replace the prompt text and notify host listeners.
    fn write(&self, doc: &mut Document, input: NodeId, text: &str) -> Result<(), DomError>;

    /// Whether content changes show up as DOM mutations rather than events.
    fn watches_content(&self) -> bool {
        true
    }
}

struct ValueField;
struct ParagraphEditor;
struct EditableRegion;

static VALUE_FIELD: ValueField = ValueField;
static PARAGRAPH_EDITOR: ParagraphEditor = ParagraphEditor;
static EDITABLE_REGION: EditableRegion = EditableRegion;

/// Pick the adapter by inspecting the element.
pub fn adapter_for(doc: &Document, input: NodeId) -> &'static dyn PromptInput {
    adapter(classify(doc, input))
}

pub fn adapter(kind: InputKind) -> &'static dyn PromptInput {
    match kind {
        InputKind::ValueField => &VALUE_FIELD,
        InputKind::ParagraphEditor => &PARAGRAPH_EDITOR,
        InputKind::EditableRegion => &EDITABLE_REGION,
    }
}

pub fn classify(doc: &Document, input: NodeId) -> InputKind {
    if doc.has_value(input) {
        return InputKind::ValueField;
    }
    let editor_marker = EDITOR_CLASSES.iter().any(|c| doc.has_class(input, c))
        || EDITOR_ATTRIBUTES.iter().any(|a| doc.has_attribute(input, a));
    let has_paragraphs = doc
        .element_children(input)
        .into_iter()
        .any(|child| doc.tag(child) == Some("p"));
    if editor_marker || has_paragraphs {
        InputKind::ParagraphEditor
    } else {
        InputKind::EditableRegion
    }
}

/// Remove invisible marker characters.
pub fn strip_markers(text: &str) -> String {
    text.chars().filter(|c| !MARKER_CHARS.contains(c)).collect()
}

/// Blank after dropping markers and whitespace.
pub fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || MARKER_CHARS.contains(&c))
}

impl PromptInput for ValueField {
    fn kind(&self) -> InputKind {
        InputKind::ValueField
    }

    fn read(&self, doc: &Document, input: NodeId) -> String {
        doc.value(input).unwrap_or_default().to_string()
    }

    fn write(&self, doc: &mut Document, input: NodeId, text: &str) -> Result<(), DomError> {
        doc.set_value(input, text)?;
        doc.dispatch_synthetic(input, EventKind::Input);
        doc.dispatch_synthetic(input, EventKind::Change);
        Ok(())
    }

    fn watches_content(&self) -> bool {
        false
    }
}

impl PromptInput for ParagraphEditor {
    fn kind(&self) -> InputKind {
        InputKind::ParagraphEditor
    }

    fn read(&self, doc: &Document, input: NodeId) -> String {
        let paragraphs: Vec<NodeId> = doc
            .element_children(input)
            .into_iter()
            .filter(|&child| doc.tag(child) == Some("p"))
            .collect();
        if paragraphs.is_empty() {
            return strip_markers(&doc.text_content(input));
        }
        let lines: Vec<String> = paragraphs
            .into_iter()
            .map(|p| strip_markers(&doc.text_content(p)))
            .collect();
        lines.join("\n")
    }

    fn write(&self, doc: &mut Document, input: NodeId, text: &str) -> Result<(), DomError> {
        write_paragraphs(doc, input, text)?;
        doc.dispatch_synthetic(input, EventKind::Input);
        doc.dispatch_synthetic(input, EventKind::Change);
        doc.dispatch_synthetic(
            input,
            EventKind::KeyDown {
                key: ACK_KEY.to_string(),
            },
        );
        Ok(())
    }
}

impl PromptInput for EditableRegion {
    fn kind(&self) -> InputKind {
        InputKind::EditableRegion
    }

    /// Inline children join into one line; block children and `<br>` break lines.
    fn read(&self, doc: &Document, input: NodeId) -> String {
        let mut lines = Vec::new();
        let mut run: Option<String> = None;
        for &child in doc.children(input) {
            match doc.tag(child) {
                Some("br") => lines.push(run.take().unwrap_or_default()),
                Some(tag) if BLOCK_TAGS.contains(&tag) => {
                    lines.extend(run.take());
                    lines.push(doc.text_content(child));
                }
                _ => run
                    .get_or_insert_with(String::new)
                    .push_str(&doc.text_content(child)),
            }
        }
        lines.extend(run);
        strip_markers(&lines.join("\n"))
    }

    fn write(&self, doc: &mut Document, input: NodeId, text: &str) -> Result<(), DomError> {
        write_paragraphs(doc, input, text)?;
        doc.dispatch_synthetic(input, EventKind::Input);
        Ok(())
    }
}

/// Replace the content with one `<p>` per line; empty lines get a `<br>`.
fn write_paragraphs(doc: &mut Document, input: NodeId, text: &str) -> Result<(), DomError> {
    let mut paragraphs = Vec::new();
    for line in text.split('\n') {
        let p = doc.create_element("p");
        let child = if line.is_empty() {
            doc.create_element("br")
        } else {
            doc.create_text(line)
        };
        doc.append_child(p, child)?;
        paragraphs.push(p);
    }
    doc.replace_children(input, paragraphs)
}

#[cfg(test)]
#[path = "text_io_tests.rs"]
mod tests;
