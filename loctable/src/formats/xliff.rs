//! Support for XLIFF translation-interchange documents.
//!
//! The working namespace is whatever namespace the root element is in; no fixed
//! namespace URI is assumed. Every `trans-unit` contributes its `source` text to the
//! source table. Its `target` text reaches the target table only when the unit is
//! marked `translate="no"` or the target has `state="final"`.

use std::{io::BufRead, path::Path};

use quick_xml::{
    NsReader,
    events::{BytesStart, Event},
    name::ResolveResult,
};

use crate::{
    error::Error,
    policy::ErrorPolicy,
    traits::Parser,
    types::LocalizationTable,
};

const UNIT_TAG: &[u8] = b"trans-unit";
const SOURCE_TAG: &[u8] = b"source";
const TARGET_TAG: &[u8] = b"target";
const KEY_ATTRIBUTE: &[u8] = b"resname";
const TRANSLATE_ATTRIBUTE: &[u8] = b"translate";
const STATE_ATTRIBUTE: &[u8] = b"state";
const FINAL_STATE: &str = "final";
const NOT_TRANSLATABLE: &str = "no";

/// Source and target tables of one XLIFF document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub source: LocalizationTable,
    pub target: LocalizationTable,
}

impl Document {
    pub fn into_tables(self) -> (LocalizationTable, LocalizationTable) {
        (self.source, self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Source,
    Target,
}

/// Leading text of a `source`/`target` element being read.
#[derive(Debug)]
struct Capture {
    part: Part,
    depth: usize,
    text: String,
    /// Set once a child element starts; text after it is not part of the value.
    closed: bool,
}

#[derive(Debug, Default)]
struct Unit {
    key: Option<String>,
    translate: Option<String>,
    depth: usize,
    source: Option<String>,
    target: Option<String>,
    target_state: Option<String>,
}

impl Unit {
    fn open(element: &BytesStart, depth: usize, policy: &ErrorPolicy) -> Result<Self, Error> {
        let key = attribute(element, KEY_ATTRIBUTE)?;
        if key.is_none() {
            policy.report(Error::InvalidResource(
                "trans-unit missing 'resname'".to_string(),
            ))?;
        }
        Ok(Unit {
            key,
            translate: attribute(element, TRANSLATE_ATTRIBUTE)?,
            depth,
            ..Default::default()
        })
    }

    fn is_target_accepted(&self) -> bool {
        self.translate.as_deref() == Some(NOT_TRANSLATABLE)
            || self.target_state.as_deref() == Some(FINAL_STATE)
    }

    fn store(&mut self, part: Part, text: String) {
        match part {
            Part::Source => self.source = Some(text),
            Part::Target => self.target = Some(text),
        }
    }

    fn commit(self, document: &mut Document) {
        let accepted = self.is_target_accepted();
        let Some(key) = self.key else {
            return;
        };
        document
            .source
            .set(key.as_str(), self.source.unwrap_or_default());
        if let (true, Some(target)) = (accepted, self.target) {
            document.target.set(key, target);
        }
    }
}

fn attribute(element: &BytesStart, name: &[u8]) -> Result<Option<String>, Error> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn namespace_of(resolved: &ResolveResult) -> Option<Vec<u8>> {
    match resolved {
        ResolveResult::Bound(namespace) => Some(namespace.0.to_vec()),
        _ => None,
    }
}

/// Reader state for one document walk.
struct Walker<'p> {
    policy: &'p ErrorPolicy,
    root_namespace: Option<Option<Vec<u8>>>,
    unit: Option<Unit>,
    capture: Option<Capture>,
    document: Document,
}

impl Walker<'_> {
    /// Handles an element opening at `depth` (1 = root). `is_empty` marks `<tag/>`.
    fn open(
        &mut self,
        element: &BytesStart,
        namespace: Option<Vec<u8>>,
        depth: usize,
        is_empty: bool,
    ) -> Result<(), Error> {
        if self.root_namespace.is_none() {
            self.root_namespace = Some(namespace);
            return Ok(());
        }
        let in_namespace = self.root_namespace.as_ref() == Some(&namespace);

        if let Some(capture) = self.capture.as_mut() {
            capture.closed = true;
            return Ok(());
        }

        let local_name = element.local_name();
        if self.unit.is_none() {
            if in_namespace && local_name.as_ref() == UNIT_TAG {
                let unit = Unit::open(element, depth, self.policy)?;
                if is_empty {
                    unit.commit(&mut self.document);
                } else {
                    self.unit = Some(unit);
                }
            }
            return Ok(());
        }

        let Some(unit) = self.unit.as_mut() else {
            return Ok(());
        };
        if !in_namespace || depth != unit.depth + 1 {
            return Ok(());
        }
        let part = match local_name.as_ref() {
            SOURCE_TAG if unit.source.is_none() => Part::Source,
            TARGET_TAG if unit.target.is_none() => {
                unit.target_state = attribute(element, STATE_ATTRIBUTE)?;
                Part::Target
            }
            _ => return Ok(()),
        };
        if is_empty {
            unit.store(part, String::new());
        } else {
            self.capture = Some(Capture {
                part,
                depth,
                text: String::new(),
                closed: false,
            });
        }
        Ok(())
    }

    fn text(&mut self, depth: usize, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            if capture.depth == depth && !capture.closed {
                capture.text.push_str(text);
            }
        }
    }

    fn close(&mut self, depth: usize) {
        if let Some(capture) = self.capture.take_if(|c| c.depth == depth) {
            if let Some(unit) = self.unit.as_mut() {
                unit.store(capture.part, capture.text);
            }
        } else if let Some(unit) = self.unit.take_if(|u| u.depth == depth) {
            unit.commit(&mut self.document);
        }
    }
}

impl Parser for Document {
    fn from_reader<R: BufRead>(reader: R, policy: &ErrorPolicy) -> Result<Self, Error> {
        let mut xml_reader = NsReader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut walker = Walker {
            policy,
            root_namespace: None,
            unit: None,
            capture: None,
            document: Document::default(),
        };
        let mut depth = 0usize;
        let mut buf = Vec::new();

        loop {
            let (resolved, event) = xml_reader.read_resolved_event_into(&mut buf)?;
            let namespace = namespace_of(&resolved);
            match event {
                Event::Start(ref e) => {
                    depth += 1;
                    walker.open(e, namespace, depth, false)?;
                }
                Event::Empty(ref e) => walker.open(e, namespace, depth + 1, true)?,
                Event::Text(ref e) => walker.text(depth, &e.unescape()?),
                Event::CData(ref e) => walker.text(depth, &String::from_utf8_lossy(e)),
                Event::End(_) => {
                    walker.close(depth);
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(walker.document)
    }
}

impl LocalizationTable {
    /// Loads `(source, target)` tables from an XLIFF document.
    pub fn from_xliff_file<P: AsRef<Path>>(
        path: P,
        policy: &ErrorPolicy,
    ) -> Result<(Self, Self), Error> {
        Ok(Document::read_from(path, policy)?.into_tables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn parse(xml: &str) -> Document {
        Document::from_str(xml, &ErrorPolicy::strict()).unwrap()
    }

    #[test]
    fn test_parse_namespaced_document() {
        let xml = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
              <file original="global.ini" source-language="en" target-language="uk">
                <body>
                  <trans-unit id="1" resname="ui_title">
                    <source>Main Menu</source>
                    <target state="final">Головне меню</target>
                  </trans-unit>
                  <trans-unit id="2" resname="ui_exit">
                    <source>Exit</source>
                    <target state="translated">Вихід</target>
                  </trans-unit>
                  <trans-unit id="3" resname="ui_logo" translate="no">
                    <source>LOGO</source>
                    <target>LOGO</target>
                  </trans-unit>
                </body>
              </file>
            </xliff>
        "#};
        let document = parse(xml);
        assert_eq!(
            document.source.iter().collect::<Vec<_>>(),
            vec![("ui_title", "Main Menu"), ("ui_exit", "Exit"), ("ui_logo", "LOGO")]
        );
        assert_eq!(
            document.target.iter().collect::<Vec<_>>(),
            vec![("ui_title", "Головне меню"), ("ui_logo", "LOGO")]
        );
    }

    #[test]
    fn test_prefixed_namespace_taken_from_root() {
        let xml = indoc! {r#"
            <x:xliff xmlns:x="urn:example:custom">
              <x:trans-unit resname="a">
                <x:source>A</x:source>
                <x:target state="final">Б</x:target>
              </x:trans-unit>
              <trans-unit resname="foreign">
                <source>ignored</source>
              </trans-unit>
            </x:xliff>
        "#};
        let document = parse(xml);
        assert_eq!(document.source.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(document.target.get("a"), Some("Б"));
    }

    #[test]
    fn test_missing_source_and_empty_target() {
        let xml = indoc! {r#"
            <xliff xmlns="urn:oasis:names:tc:xliff:document:1.2">
              <trans-unit resname="no_source">
                <target state="final"/>
              </trans-unit>
              <trans-unit resname="no_target"><source>Text</source></trans-unit>
            </xliff>
        "#};
        let document = parse(xml);
        assert_eq!(document.source.get("no_source"), Some(""));
        assert_eq!(document.target.get("no_source"), Some(""));
        assert_eq!(document.source.get("no_target"), Some("Text"));
        assert!(!document.target.contains("no_target"));
    }

    #[test]
    fn test_text_is_unescaped_and_whitespace_kept() {
        let xml = indoc! {r#"
            <xliff xmlns="urn:x">
              <trans-unit resname="k"><source> a &amp; b &lt;tag&gt; </source></trans-unit>
            </xliff>
        "#};
        let document = parse(xml);
        assert_eq!(document.source.get("k"), Some(" a & b <tag> "));
    }

    #[test]
    fn test_only_leading_text_before_inline_child() {
        let xml = indoc! {r#"
            <xliff xmlns="urn:x">
              <trans-unit resname="k"><source>Hello <g id="1">there</g> world</source></trans-unit>
            </xliff>
        "#};
        let document = parse(xml);
        assert_eq!(document.source.get("k"), Some("Hello "));
    }

    #[test]
    fn test_missing_resname() {
        let xml = r#"<xliff xmlns="urn:x"><trans-unit><source>A</source></trans-unit><trans-unit resname="b"><source>B</source></trans-unit></xliff>"#;
        let strict = Document::from_str(xml, &ErrorPolicy::strict());
        assert!(matches!(strict, Err(Error::InvalidResource(_))));

        let lenient = Document::from_str(xml, &ErrorPolicy::new()).unwrap();
        assert_eq!(lenient.source.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_final_target_committed_and_keyless_unit_dropped() {
        let xml = r#"<xliff xmlns="urn:x"><trans-unit translate="no"><source>A</source><target>A</target></trans-unit><trans-unit resname="k"><source>Key</source><target state="final">Ключ</target></trans-unit></xliff>"#;
        let document = Document::from_str(xml, &ErrorPolicy::new()).unwrap();
        assert_eq!(document.source.keys().collect::<Vec<_>>(), vec!["k"]);
        assert_eq!(document.target.iter().collect::<Vec<_>>(), vec![("k", "Ключ")]);
    }

    #[test]
    fn test_cdata_source() {
        let xml = r#"<xliff xmlns="urn:x"><trans-unit resname="k"><source><![CDATA[<b>%d</b>]]></source></trans-unit></xliff>"#;
        let document = parse(xml);
        assert_eq!(document.source.get("k"), Some("<b>%d</b>"));
    }
}
