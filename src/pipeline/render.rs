//! PPTX serialisation: [`Document`] → Office Open XML package bytes.
//!
//! A `.pptx` file is a ZIP archive of XML parts tied together by
//! relationship files. This module writes the smallest package PowerPoint,
//! Keynote and LibreOffice all open without repair prompts:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/{core,app}.xml
//! ppt/presentation.xml            + _rels
//! ppt/presProps.xml
//! ppt/slideMasters/slideMaster1.xml + _rels
//! ppt/slideLayouts/slideLayout1.xml  title layout    + _rels
//! ppt/slideLayouts/slideLayout2.xml  content layout  + _rels
//! ppt/theme/theme1.xml
//! ppt/slides/slideN.xml           + _rels   (one per slide)
//! ```
//!
//! Slide shapes are placeholders that inherit their position from the
//! layout; every run carries explicit size, color and typeface so the deck
//! style survives whatever theme the viewer applies. The whole archive is
//! built in memory; nothing touches the file system here.

use crate::config::SlideSize;
use crate::document::{
    Alignment, Document, Paragraph, RegionRole, Slide, SlideLayout, TextRegion,
};
use crate::error::DeckError;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of the produced file.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const APP_NAME: &str = "edgequake-topic2pptx";

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// EMU per inch.
const EMU: i64 = 914_400;

type XmlWriter = Writer<Vec<u8>>;
type XmlResult = quick_xml::Result<()>;

/// Serialise `doc` into a complete `.pptx` archive.
///
/// # Errors
/// [`DeckError::Assembly`] if the document has no slides or an XML/ZIP
/// write fails.
pub fn write_pptx(doc: &Document, slide_size: SlideSize) -> Result<Vec<u8>, DeckError> {
    if doc.slides.is_empty() {
        return Err(DeckError::Assembly("document has no slides".into()));
    }
    let geometry = Geometry::new(slide_size);

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types(doc.slides.len())?),
        ("_rels/.rels".into(), package_rels()?),
        ("docProps/core.xml".into(), core_props(doc)?),
        ("docProps/app.xml".into(), app_props(doc)?),
        ("ppt/presentation.xml".into(), presentation(doc, slide_size)?),
        ("ppt/_rels/presentation.xml.rels".into(), presentation_rels(doc)?),
        ("ppt/presProps.xml".into(), pres_props()?),
        ("ppt/slideMasters/slideMaster1.xml".into(), slide_master(&geometry)?),
        ("ppt/slideMasters/_rels/slideMaster1.xml.rels".into(), master_rels()?),
        (
            "ppt/slideLayouts/slideLayout1.xml".into(),
            slide_layout(SlideLayout::Title, &geometry)?,
        ),
        ("ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(), layout_rels()?),
        (
            "ppt/slideLayouts/slideLayout2.xml".into(),
            slide_layout(SlideLayout::Content, &geometry)?,
        ),
        ("ppt/slideLayouts/_rels/slideLayout2.xml.rels".into(), layout_rels()?),
        ("ppt/theme/theme1.xml".into(), theme()?),
    ];

    for (i, slide) in doc.slides.iter().enumerate() {
        let n = i + 1;
        parts.push((format!("ppt/slides/slide{n}.xml"), slide_part(slide)?));
        parts.push((format!("ppt/slides/_rels/slide{n}.xml.rels"), slide_rels(slide)?));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in &parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)
            .map_err(|e| DeckError::Assembly(format!("writing part '{name}': {e}")))?;
    }
    let bytes = zip.finish()?.into_inner();

    debug!(
        "Serialised {} slides into {} parts, {} bytes",
        doc.slides.len(),
        parts.len(),
        bytes.len()
    );
    Ok(bytes)
}

// ── XML helpers ──────────────────────────────────────────────────────────────

fn xml_part(body: impl FnOnce(&mut XmlWriter) -> XmlResult) -> Result<Vec<u8>, DeckError> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    body(&mut w)?;
    Ok(w.into_inner())
}

/// Write a fixed, already-escaped XML fragment.
fn raw(w: &mut XmlWriter, fragment: &str) -> XmlResult {
    w.write_event(Event::Text(BytesText::from_escaped(fragment)))
}

/// `(Id, Type, Target)` triples → a `.rels` part.
fn relationships(
    rels: &[(impl AsRef<str>, &str, impl AsRef<str>)],
) -> Result<Vec<u8>, DeckError> {
    xml_part(|w| {
        w.create_element("Relationships")
            .with_attribute(("xmlns", NS_RELS))
            .write_inner_content(|w| {
                for (id, kind, target) in rels {
                    w.create_element("Relationship")
                        .with_attribute(("Id", id.as_ref()))
                        .with_attribute(("Type", *kind))
                        .with_attribute(("Target", target.as_ref()))
                        .write_empty()?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// Open a PresentationML root element with the three standard namespaces.
fn pml_root<'a>(
    w: &'a mut XmlWriter,
    name: &'a str,
) -> quick_xml::writer::ElementWriter<'a, Vec<u8>> {
    w.create_element(name)
        .with_attribute(("xmlns:a", NS_A))
        .with_attribute(("xmlns:r", NS_R))
        .with_attribute(("xmlns:p", NS_P))
}

// ── Package-level parts ──────────────────────────────────────────────────────

fn content_types(slide_count: usize) -> Result<Vec<u8>, DeckError> {
    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".into(), CT_PRESENTATION),
        ("/ppt/presProps.xml".into(), CT_PRES_PROPS),
        ("/ppt/slideMasters/slideMaster1.xml".into(), CT_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".into(), CT_LAYOUT),
        ("/ppt/slideLayouts/slideLayout2.xml".into(), CT_LAYOUT),
        ("/ppt/theme/theme1.xml".into(), CT_THEME),
        ("/docProps/core.xml".into(), CT_CORE),
        ("/docProps/app.xml".into(), CT_APP),
    ];
    overrides.extend((1..=slide_count).map(|n| (format!("/ppt/slides/slide{n}.xml"), CT_SLIDE)));

    xml_part(|w| {
        w.create_element("Types")
            .with_attribute(("xmlns", NS_TYPES))
            .write_inner_content(|w| {
                w.create_element("Default")
                    .with_attribute(("Extension", "rels"))
                    .with_attribute(("ContentType", CT_RELS))
                    .write_empty()?;
                w.create_element("Default")
                    .with_attribute(("Extension", "xml"))
                    .with_attribute(("ContentType", "application/xml"))
                    .write_empty()?;
                for (part, ct) in &overrides {
                    w.create_element("Override")
                        .with_attribute(("PartName", part.as_str()))
                        .with_attribute(("ContentType", *ct))
                        .write_empty()?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

fn package_rels() -> Result<Vec<u8>, DeckError> {
    relationships(&[
        ("rId1", REL_OFFICE_DOC, "ppt/presentation.xml"),
        ("rId2", REL_CORE, "docProps/core.xml"),
        ("rId3", REL_APP, "docProps/app.xml"),
    ])
}

fn deck_title(doc: &Document) -> String {
    doc.slides
        .first()
        .and_then(|s| s.region(RegionRole::Title))
        .and_then(|r| r.paragraphs.first())
        .map(Paragraph::text)
        .unwrap_or_default()
}

fn core_props(doc: &Document) -> Result<Vec<u8>, DeckError> {
    let title = deck_title(doc);
    xml_part(|w| {
        w.create_element("cp:coreProperties")
            .with_attribute((
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ))
            .with_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"))
            .with_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"))
            .with_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"))
            .write_inner_content(|w| {
                w.create_element("dc:title")
                    .write_text_content(BytesText::new(&title))?;
                w.create_element("dc:creator")
                    .write_text_content(BytesText::new(APP_NAME))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

fn app_props(doc: &Document) -> Result<Vec<u8>, DeckError> {
    let slides = doc.slides.len().to_string();
    xml_part(|w| {
        w.create_element("Properties")
            .with_attribute((
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ))
            .write_inner_content(|w| {
                w.create_element("Application")
                    .write_text_content(BytesText::new(APP_NAME))?;
                w.create_element("Slides")
                    .write_text_content(BytesText::new(&slides))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

// ── Presentation part ────────────────────────────────────────────────────────

// rId1 master, rId2 theme, rId3 presProps, rId4.. slides.
const FIRST_SLIDE_REL: usize = 4;

fn presentation(doc: &Document, slide_size: SlideSize) -> Result<Vec<u8>, DeckError> {
    let (cx, cy) = slide_size.emu();
    let (cx, cy) = (cx.to_string(), cy.to_string());
    xml_part(|w| {
        pml_root(w, "p:presentation")
            .with_attribute(("saveSubsetFonts", "1"))
            .write_inner_content(|w| {
                w.create_element("p:sldMasterIdLst").write_inner_content(|w| {
                    w.create_element("p:sldMasterId")
                        .with_attribute(("id", "2147483648"))
                        .with_attribute(("r:id", "rId1"))
                        .write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                w.create_element("p:sldIdLst").write_inner_content(|w| {
                    for i in 0..doc.slides.len() {
                        let rel_id = format!("rId{}", FIRST_SLIDE_REL + i);
                        w.create_element("p:sldId")
                            .with_attribute(("id", (256 + i).to_string().as_str()))
                            .with_attribute(("r:id", rel_id.as_str()))
                            .write_empty()?;
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
                let mut sld_sz = w
                    .create_element("p:sldSz")
                    .with_attribute(("cx", cx.as_str()))
                    .with_attribute(("cy", cy.as_str()));
                if slide_size == SlideSize::Standard {
                    sld_sz = sld_sz.with_attribute(("type", "screen4x3"));
                }
                sld_sz.write_empty()?;
                w.create_element("p:notesSz")
                    .with_attribute(("cx", "6858000"))
                    .with_attribute(("cy", "9144000"))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

fn presentation_rels(doc: &Document) -> Result<Vec<u8>, DeckError> {
    let mut rels = vec![
        ("rId1".to_string(), REL_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
        ("rId3".to_string(), REL_PRES_PROPS, "presProps.xml".to_string()),
    ];
    rels.extend((0..doc.slides.len()).map(|i| {
        (
            format!("rId{}", FIRST_SLIDE_REL + i),
            REL_SLIDE,
            format!("slides/slide{}.xml", i + 1),
        )
    }));
    relationships(rels.as_slice())
}

fn pres_props() -> Result<Vec<u8>, DeckError> {
    xml_part(|w| {
        pml_root(w, "p:presentationPr").write_empty()?;
        Ok(())
    })
}

// ── Master, layouts, theme ───────────────────────────────────────────────────

/// Placeholder rectangles derived from the slide size (x, y, cx, cy in EMU).
struct Geometry {
    title: [i64; 4],
    body: [i64; 4],
    center_title: [i64; 4],
    subtitle: [i64; 4],
}

impl Geometry {
    fn new(size: SlideSize) -> Self {
        let (w, h) = size.emu();
        let margin = EMU / 2;
        Self {
            title: [margin, 274_638, w - 2 * margin, 1_143_000],
            body: [margin, 1_600_200, w - 2 * margin, h - 1_600_200 - 731_837],
            center_title: [3 * EMU / 4, 2_130_425, w - 3 * EMU / 2, 1_470_025],
            subtitle: [3 * EMU / 2, 3_886_200, w - 3 * EMU, 1_752_600],
        }
    }
}

/// `p:ph` attributes for a region on a given layout.
fn placeholder(
    layout: SlideLayout,
    role: RegionRole,
) -> (Option<&'static str>, Option<&'static str>) {
    match (layout, role) {
        (SlideLayout::Title, RegionRole::Title) => (Some("ctrTitle"), None),
        (SlideLayout::Content, RegionRole::Title) => (Some("title"), None),
        (_, RegionRole::Subtitle) => (Some("subTitle"), Some("1")),
        (_, RegionRole::Body) => (None, Some("1")),
    }
}

fn shape_name(role: RegionRole, id: usize) -> String {
    match role {
        RegionRole::Title => format!("Title {}", id - 1),
        RegionRole::Subtitle => format!("Subtitle {}", id - 1),
        RegionRole::Body => format!("Content Placeholder {}", id - 1),
    }
}

fn write_group_header(w: &mut XmlWriter) -> XmlResult {
    raw(w, GROUP_HEADER)
}

const GROUP_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// Non-visual shape properties shared by template and slide shapes.
fn write_nv_sp_pr(
    w: &mut XmlWriter,
    id: usize,
    name: &str,
    ph: (Option<&str>, Option<&str>),
) -> XmlResult {
    w.create_element("p:nvSpPr").write_inner_content(|w| {
        w.create_element("p:cNvPr")
            .with_attribute(("id", id.to_string().as_str()))
            .with_attribute(("name", name))
            .write_empty()?;
        w.create_element("p:cNvSpPr").write_inner_content(|w| {
            w.create_element("a:spLocks")
                .with_attribute(("noGrp", "1"))
                .write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:nvPr").write_inner_content(|w| {
            let mut el = w.create_element("p:ph");
            if let Some(kind) = ph.0 {
                el = el.with_attribute(("type", kind));
            }
            if let Some(idx) = ph.1 {
                el = el.with_attribute(("idx", idx));
            }
            el.write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

/// An empty placeholder with explicit position, for masters and layouts.
fn write_template_shape(
    w: &mut XmlWriter,
    id: usize,
    name: &str,
    ph: (Option<&str>, Option<&str>),
    rect: [i64; 4],
    list_style: &str,
) -> XmlResult {
    w.create_element("p:sp").write_inner_content(|w| {
        write_nv_sp_pr(w, id, name, ph)?;
        w.create_element("p:spPr").write_inner_content(|w| {
            w.create_element("a:xfrm").write_inner_content(|w| {
                w.create_element("a:off")
                    .with_attribute(("x", rect[0].to_string().as_str()))
                    .with_attribute(("y", rect[1].to_string().as_str()))
                    .write_empty()?;
                w.create_element("a:ext")
                    .with_attribute(("cx", rect[2].to_string().as_str()))
                    .with_attribute(("cy", rect[3].to_string().as_str()))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:txBody").write_inner_content(|w| {
            raw(w, "<a:bodyPr/>")?;
            raw(w, list_style)?;
            raw(w, r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#)
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

const MASTER_CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

const MASTER_TX_STYLES: &str = r#"<p:txStyles><p:titleStyle><a:lvl1pPr algn="ctr"><a:defRPr sz="4400"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900"><a:buChar char="&#8226;"/><a:defRPr sz="3200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr/></a:lvl1pPr></p:otherStyle></p:txStyles>"#;

const MASTER_LAYOUT_IDS: &str = r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst>"#;

const EMPTY_LST: &str = "<a:lstStyle/>";

const SUBTITLE_LIST_STYLE: &str =
    r#"<a:lstStyle><a:lvl1pPr marL="0" indent="0" algn="ctr"><a:buNone/></a:lvl1pPr></a:lstStyle>"#;

fn slide_master(g: &Geometry) -> Result<Vec<u8>, DeckError> {
    xml_part(|w| {
        pml_root(w, "p:sldMaster").write_inner_content(|w| {
            w.create_element("p:cSld").write_inner_content(|w| {
                raw(
                    w,
                    r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
                )?;
                w.create_element("p:spTree").write_inner_content(|w| {
                    write_group_header(w)?;
                    let title_ph = (Some("title"), None);
                    let body_ph = (Some("body"), Some("1"));
                    let lst = EMPTY_LST;
                    write_template_shape(w, 2, "Title Placeholder 1", title_ph, g.title, lst)?;
                    write_template_shape(w, 3, "Text Placeholder 2", body_ph, g.body, lst)?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
            raw(w, MASTER_CLR_MAP)?;
            raw(w, MASTER_LAYOUT_IDS)?;
            raw(w, MASTER_TX_STYLES)
        })?;
        Ok(())
    })
}

fn master_rels() -> Result<Vec<u8>, DeckError> {
    relationships(&[
        ("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        ("rId2", REL_LAYOUT, "../slideLayouts/slideLayout2.xml"),
        ("rId3", REL_THEME, "../theme/theme1.xml"),
    ])
}

fn slide_layout(layout: SlideLayout, g: &Geometry) -> Result<Vec<u8>, DeckError> {
    let (kind, name) = match layout {
        SlideLayout::Title => ("title", "Title Slide"),
        SlideLayout::Content => ("obj", "Title and Content"),
    };
    xml_part(|w| {
        pml_root(w, "p:sldLayout")
            .with_attribute(("type", kind))
            .with_attribute(("preserve", "1"))
            .write_inner_content(|w| {
                w.create_element("p:cSld")
                    .with_attribute(("name", name))
                    .write_inner_content(|w| {
                        w.create_element("p:spTree").write_inner_content(|w| {
                            write_group_header(w)?;
                            match layout {
                                SlideLayout::Title => {
                                    let ph = placeholder(layout, RegionRole::Title);
                                    let (rect, lst) = (g.center_title, EMPTY_LST);
                                    write_template_shape(w, 2, "Title 1", ph, rect, lst)?;
                                    let ph = placeholder(layout, RegionRole::Subtitle);
                                    let (rect, lst) = (g.subtitle, SUBTITLE_LIST_STYLE);
                                    write_template_shape(w, 3, "Subtitle 2", ph, rect, lst)?;
                                }
                                SlideLayout::Content => {
                                    let ph = placeholder(layout, RegionRole::Title);
                                    write_template_shape(w, 2, "Title 1", ph, g.title, EMPTY_LST)?;
                                    let ph = placeholder(layout, RegionRole::Body);
                                    let name = "Content Placeholder 2";
                                    write_template_shape(w, 3, name, ph, g.body, EMPTY_LST)?;
                                }
                            }
                            Ok::<(), quick_xml::Error>(())
                        })?;
                        Ok::<(), quick_xml::Error>(())
                    })?;
                raw(w, r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#)
            })?;
        Ok(())
    })
}

fn layout_rels() -> Result<Vec<u8>, DeckError> {
    relationships(&[(
        "rId1",
        REL_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

fn theme() -> Result<Vec<u8>, DeckError> {
    xml_part(|w| raw(w, THEME_XML))
}

const THEME_XML: &str = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

// ── Slides ───────────────────────────────────────────────────────────────────

fn slide_part(slide: &Slide) -> Result<Vec<u8>, DeckError> {
    xml_part(|w| {
        pml_root(w, "p:sld").write_inner_content(|w| {
            w.create_element("p:cSld").write_inner_content(|w| {
                w.create_element("p:spTree").write_inner_content(|w| {
                    write_group_header(w)?;
                    for (i, region) in slide.regions.iter().enumerate() {
                        write_region(w, slide.layout, region, i + 2)?;
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
            raw(w, r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#)
        })?;
        Ok(())
    })
}

fn write_region(
    w: &mut XmlWriter,
    layout: SlideLayout,
    region: &TextRegion,
    id: usize,
) -> XmlResult {
    w.create_element("p:sp").write_inner_content(|w| {
        write_nv_sp_pr(w, id, &shape_name(region.role, id), placeholder(layout, region.role))?;
        w.create_element("p:spPr").write_empty()?;
        w.create_element("p:txBody").write_inner_content(|w| {
            w.create_element("a:bodyPr")
                .with_attribute(("wrap", if region.word_wrap { "square" } else { "none" }))
                .write_empty()?;
            w.create_element("a:lstStyle").write_empty()?;
            if region.paragraphs.is_empty() {
                w.create_element("a:p").write_empty()?;
            }
            for paragraph in &region.paragraphs {
                write_paragraph(w, paragraph)?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_paragraph(w: &mut XmlWriter, p: &Paragraph) -> XmlResult {
    let algn = match p.alignment {
        Alignment::Left => "l",
    };
    w.create_element("a:p").write_inner_content(|w| {
        w.create_element("a:pPr")
            .with_attribute(("lvl", p.level.to_string().as_str()))
            .with_attribute(("algn", algn))
            .write_empty()?;
        for run in &p.runs {
            w.create_element("a:r").write_inner_content(|w| {
                let rpr = w
                    .create_element("a:rPr")
                    .with_attribute(("lang", "en-US"))
                    .with_attribute(("dirty", "0"));
                match &run.font {
                    Some(font) => {
                        rpr.with_attribute(("sz", (font.size_pt * 100).to_string().as_str()))
                            .write_inner_content(|w| {
                                w.create_element("a:solidFill").write_inner_content(|w| {
                                    w.create_element("a:srgbClr")
                                        .with_attribute(("val", font.color.to_hex().as_str()))
                                        .write_empty()?;
                                    Ok::<(), quick_xml::Error>(())
                                })?;
                                w.create_element("a:latin")
                                    .with_attribute(("typeface", font.family.as_str()))
                                    .write_empty()?;
                                Ok::<(), quick_xml::Error>(())
                            })?;
                    }
                    None => {
                        rpr.write_empty()?;
                    }
                }
                w.create_element("a:t")
                    .write_text_content(BytesText::new(&run.text))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        }
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn slide_rels(slide: &Slide) -> Result<Vec<u8>, DeckError> {
    let layout = match slide.layout {
        SlideLayout::Title => "../slideLayouts/slideLayout1.xml",
        SlideLayout::Content => "../slideLayouts/slideLayout2.xml",
    };
    relationships(&[("rId1", REL_LAYOUT, layout)])
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::SlideRecord;
    use crate::pipeline::assemble::assemble;
    use crate::style::{resolve, StyleProfile};
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_doc() -> Document {
        let deck = vec![
            SlideRecord::new("Intro to AI & <Friends>", ["A \"gentle\" tour"]),
            SlideRecord::new("History", ["1956", "2012"]),
        ];
        assemble(&deck, &resolve(&StyleProfile::default()).unwrap()).unwrap()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut s = String::new();
        file.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn package_has_all_parts() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/presProps.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
        assert!(!names.contains(&"ppt/slides/slide3.xml"));
    }

    #[test]
    fn text_is_escaped() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("Intro to AI &amp; &lt;Friends&gt;"));
        assert!(!slide1.contains("<Friends>"));
    }

    #[test]
    fn runs_carry_style() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains(r#"type="ctrTitle""#));
        assert!(slide1.contains(r#"type="subTitle""#));
        assert!(slide1.contains(r#"sz="4000""#));
        assert!(slide1.contains(r#"sz="2800""#));
        assert!(slide1.contains(r#"val="004B96""#));
        assert!(slide1.contains(r#"typeface="Arial""#));
        assert!(slide1.contains(r#"algn="l""#));
        assert!(slide1.contains(r#"wrap="square""#));

        let slide2 = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(slide2.contains(r#"<p:ph type="title"/>"#));
        assert!(slide2.contains(r#"<p:ph idx="1"/>"#));
        assert_eq!(slide2.matches(r#"sz="2000""#).count(), 2);
    }

    #[test]
    fn every_slide_paragraph_is_left_aligned() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        for part in ["ppt/slides/slide1.xml", "ppt/slides/slide2.xml"] {
            let xml = read_part(&bytes, part);
            let paragraphs = xml.matches("<a:pPr ").count();
            assert!(paragraphs > 0);
            assert_eq!(xml.matches(r#"algn="l""#).count(), paragraphs, "{part}");
        }
    }

    #[test]
    fn slides_link_to_their_layouts() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        assert!(read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels").contains("slideLayout1.xml"));
        assert!(read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels").contains("slideLayout2.xml"));
    }

    #[test]
    fn presentation_lists_slides_in_order() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        let first = pres.find(r#"id="256""#).unwrap();
        let second = pres.find(r#"id="257""#).unwrap();
        assert!(first < second);
        assert!(pres.contains(r#"type="screen4x3""#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId4""#) && rels.contains("slides/slide1.xml"));
        assert!(rels.contains(r#"Id="rId5""#) && rels.contains("slides/slide2.xml"));
    }

    #[test]
    fn widescreen_size() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Widescreen).unwrap();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        assert!(pres.contains(r#"cx="12192000""#));
        assert!(!pres.contains("screen4x3"));
    }

    #[test]
    fn content_types_cover_every_slide() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        let ct = read_part(&bytes, "[Content_Types].xml");
        assert_eq!(ct.matches(CT_SLIDE).count(), 2);
        assert!(ct.contains("/ppt/slides/slide2.xml"));
    }

    #[test]
    fn core_props_use_deck_title() {
        let bytes = write_pptx(&sample_doc(), SlideSize::Standard).unwrap();
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Intro to AI &amp; &lt;Friends&gt;</dc:title>"));
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = write_pptx(&Document::default(), SlideSize::Standard).unwrap_err();
        assert!(matches!(err, DeckError::Assembly(_)));
    }

    #[test]
    fn content_slide_without_bullets_still_has_a_paragraph() {
        let deck = vec![
            SlideRecord::new("Title", ["Sub"]),
            SlideRecord::new("Empty", Vec::<String>::new()),
        ];
        let doc = assemble(&deck, &resolve(&StyleProfile::default()).unwrap()).unwrap();
        let bytes = write_pptx(&doc, SlideSize::Standard).unwrap();
        let slide2 = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(slide2.contains("<a:p/>"));
    }
}
