// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to the domain model.

use crate::error::AppError;
use crate::model::blocks::*;
use crate::model::{ContentNode, NodeKind, PageMeta};
use crate::types::{
    Annotations, BlockId, Color, Link, PageId, RichTextItem, RichTextType, ValidationError,
};
use notion_client::objects::block::{Block as NcBlock, BlockType};
use notion_client::objects::rich_text::RichText as NcRichText;
use std::collections::HashMap;

/// Title properties checked in order before any other title-typed property.
const TITLE_PROPERTY_NAMES: [&str; 4] = ["Title", "Name", "title", "name"];

/// Convert notion-client Page to page metadata
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<PageMeta, AppError> {
    Ok(PageMeta {
        id: PageId::parse(&notion_page.id)?,
        title: extract_page_title(notion_page.properties),
        url: notion_page.url,
        last_edited_time: Some(notion_page.last_edited_time),
    })
}

/// Convert notion-client Block to a childless content node
pub fn convert_block(notion_block: NcBlock) -> Result<ContentNode, AppError> {
    let id = BlockId::parse(notion_block.id.as_deref().ok_or(ValidationError::EmptyField("block id"))?)?;
    let has_children = notion_block.has_children.unwrap_or(false);
    let type_name = block_type_name(&notion_block.block_type);

    let kind = match notion_block.block_type {
        BlockType::Paragraph { paragraph } => NodeKind::Paragraph(convert_text_block_content(
            paragraph.rich_text,
            paragraph.color,
        )),
        BlockType::Heading1 { heading_1 } => NodeKind::Heading1(convert_text_block_content(
            heading_1.rich_text,
            heading_1.color,
        )),
        BlockType::Heading2 { heading_2 } => NodeKind::Heading2(convert_text_block_content(
            heading_2.rich_text,
            heading_2.color,
        )),
        BlockType::Heading3 { heading_3 } => NodeKind::Heading3(convert_text_block_content(
            heading_3.rich_text,
            heading_3.color,
        )),
        BlockType::BulletedListItem { bulleted_list_item } => {
            NodeKind::BulletedListItem(convert_text_block_content(
                bulleted_list_item.rich_text,
                Some(bulleted_list_item.color),
            ))
        }
        BlockType::NumberedListItem { numbered_list_item } => {
            NodeKind::NumberedListItem(convert_text_block_content(
                numbered_list_item.rich_text,
                Some(numbered_list_item.color),
            ))
        }
        BlockType::ToDo { to_do } => NodeKind::ToDo {
            content: convert_text_block_content(to_do.rich_text, to_do.color),
            checked: to_do.checked.unwrap_or(false),
        },
        // The API does not report whether a toggle is expanded.
        BlockType::Toggle { toggle } => NodeKind::Toggle {
            content: convert_text_block_content(toggle.rich_text, Some(toggle.color)),
            open: false,
        },
        BlockType::Quote { quote } => {
            NodeKind::Quote(convert_text_block_content(quote.rich_text, Some(quote.color)))
        }
        BlockType::Callout { callout } => NodeKind::Callout(CalloutContent {
            icon: callout.icon.map(convert_icon),
            content: convert_text_block_content(callout.rich_text, Some(callout.color)),
        }),
        BlockType::Divider { .. } => NodeKind::Divider,
        BlockType::Code { code } => NodeKind::Code(CodeContent {
            language: language_tag(&code.language),
            caption: convert_rich_text_array(code.caption),
            rich_text: convert_rich_text_array(code.rich_text),
        }),
        BlockType::Image { image } => NodeKind::Image(ImageContent {
            source: convert_file_object(image.file_type),
            caption: Vec::new(),
        }),
        BlockType::Table { table } => NodeKind::Table(TableLayout {
            table_width: table.table_width as usize,
            has_column_header: table.has_column_header,
            has_row_header: table.has_row_header,
        }),
        BlockType::TableRow { table_row } => NodeKind::TableRow(TableRowContent {
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect(),
        }),
        BlockType::ColumnList { .. } => NodeKind::ColumnList,
        BlockType::Column { .. } => NodeKind::Column,
        BlockType::SyncedBlock { synced_block } => NodeKind::SyncedBlock {
            synced_from: synced_block
                .synced_from
                .map(|from| match from {
                    notion_client::objects::block::SyncedFrom::BlockId { block_id } => {
                        BlockId::parse(&block_id)
                    }
                })
                .transpose()?,
        },
        BlockType::Bookmark { bookmark } => NodeKind::Bookmark(BookmarkContent {
            url: bookmark.url,
            caption: convert_rich_text_array(bookmark.caption),
        }),
        BlockType::Embed { embed } => NodeKind::Embed { url: embed.url },
        BlockType::LinkPreview { link_preview } => NodeKind::LinkPreview {
            url: link_preview.url,
        },
        BlockType::Equation { equation } => NodeKind::Unsupported {
            block_type: type_name,
            rich_text: vec![equation_item(equation.expression)],
        },
        BlockType::ChildPage { child_page } => NodeKind::Unsupported {
            block_type: type_name,
            rich_text: vec![RichTextItem::plain_text(&child_page.title)],
        },
        BlockType::Template { template } => NodeKind::Unsupported {
            block_type: type_name,
            rich_text: convert_rich_text_array(template.rich_text),
        },
        _ => NodeKind::Unsupported {
            block_type: type_name,
            rich_text: Vec::new(),
        },
    };

    let node = ContentNode::new(id, kind);
    Ok(if has_children {
        node.declaring_children()
    } else {
        node
    })
}

/// The API tag of a block type, e.g. `breadcrumb`.
fn block_type_name(block_type: &BlockType) -> String {
    serde_json::to_value(block_type)
        .ok()
        .and_then(|value| value.get("type")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "unsupported".to_string())
}

/// The API spelling of a code language, e.g. `plain text` or `rust`.
fn language_tag<L: serde::Serialize + std::fmt::Debug>(language: &L) -> String {
    serde_json::to_value(language)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", language).to_lowercase())
}

/// Convert text block content (rich text + color)
fn convert_text_block_content(
    rich_text: Vec<NcRichText>,
    color: Option<notion_client::objects::block::TextColor>,
) -> TextBlockContent {
    TextBlockContent {
        rich_text: convert_rich_text_array(rich_text),
        color: color.map(convert_block_color).unwrap_or_default(),
    }
}

/// Convert array of rich text items
fn convert_rich_text_array(rich_texts: Vec<NcRichText>) -> Vec<RichTextItem> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

/// Convert single rich text item
fn convert_rich_text(rich_text: NcRichText) -> RichTextItem {
    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            plain_text: plain_text.unwrap_or_else(|| text.content.clone()),
            text_type: RichTextType::Text {
                content: text.content,
                link: text.link.map(|link| Link { url: link.url }),
            },
            annotations: convert_annotations(annotations.unwrap_or_default()),
            href,
        },

        NcRichText::Mention {
            annotations,
            plain_text,
            href,
            ..
        } => RichTextItem {
            text_type: RichTextType::Mention,
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },

        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },

        _ => {
            log::debug!("Skipping unsupported rich text variant");
            RichTextItem::plain_text("")
        }
    }
}

fn equation_item(expression: String) -> RichTextItem {
    RichTextItem {
        plain_text: expression.clone(),
        text_type: RichTextType::Equation { expression },
        annotations: Annotations::default(),
        href: None,
    }
}

/// Convert annotations
fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
        color: convert_rich_text_color(annotations.color),
    }
}

/// Convert file object from notion-client to our domain type
fn convert_file_object(file: notion_client::objects::file::File) -> FileObject {
    use notion_client::objects::file::File as NcFile;

    match file {
        NcFile::External { external } => FileObject::External {
            external: ExternalFile { url: external.url },
        },
        NcFile::File { file } => FileObject::File {
            file: NotionFile {
                url: file.url,
                expiry_time: Some(file.expiry_time),
            },
        },
    }
}

/// Convert icon from notion-client to our domain type
fn convert_icon(icon: notion_client::objects::block::Icon) -> Icon {
    use notion_client::objects::block::Icon as NcIcon;

    match icon {
        NcIcon::Emoji(notion_client::objects::emoji::Emoji::Emoji { emoji }) => {
            Icon::Emoji { emoji }
        }
        NcIcon::File(file) => match convert_file_object(file) {
            FileObject::File { file } => Icon::File { file },
            FileObject::External { external } => Icon::External { external },
        },
    }
}

/// Generates a color conversion function from a Notion color enum to our Color type.
macro_rules! impl_color_conversion {
    ($fn_name:ident, $source:ty) => {
        fn $fn_name(color: $source) -> Color {
            match color {
                <$source>::Default => Color::Default,
                <$source>::Gray => Color::Gray,
                <$source>::Brown => Color::Brown,
                <$source>::Orange => Color::Orange,
                <$source>::Yellow => Color::Yellow,
                <$source>::Green => Color::Green,
                <$source>::Blue => Color::Blue,
                <$source>::Purple => Color::Purple,
                <$source>::Pink => Color::Pink,
                <$source>::Red => Color::Red,
                <$source>::GrayBackground => Color::GrayBackground,
                <$source>::BrownBackground => Color::BrownBackground,
                <$source>::OrangeBackground => Color::OrangeBackground,
                <$source>::YellowBackground => Color::YellowBackground,
                <$source>::GreenBackground => Color::GreenBackground,
                <$source>::BlueBackground => Color::BlueBackground,
                <$source>::PurpleBackground => Color::PurpleBackground,
                <$source>::PinkBackground => Color::PinkBackground,
                <$source>::RedBackground => Color::RedBackground,
            }
        }
    };
}

impl_color_conversion!(convert_block_color, notion_client::objects::block::TextColor);
impl_color_conversion!(
    convert_rich_text_color,
    notion_client::objects::rich_text::TextColor
);

/// Extract the page title from its properties.
///
/// Well-known property names win over any other title-typed property;
/// blank titles count as missing.
fn extract_page_title(
    properties: HashMap<String, notion_client::objects::page::PageProperty>,
) -> Option<String> {
    use notion_client::objects::page::PageProperty;

    let mut titles: HashMap<String, String> = properties
        .into_iter()
        .filter_map(|(name, property)| match property {
            PageProperty::Title { title, .. } => {
                let text: String = title
                    .into_iter()
                    .map(|rt| convert_rich_text(rt).display_text().to_string())
                    .collect();
                Some((name, text))
            }
            _ => None,
        })
        .filter(|(_, text)| !text.trim().is_empty())
        .collect();

    TITLE_PROPERTY_NAMES
        .iter()
        .find_map(|name| titles.remove(*name))
        .or_else(|| {
            let mut rest: Vec<_> = titles.into_iter().collect();
            rest.sort();
            rest.into_iter().next().map(|(_, text)| text)
        })
}
