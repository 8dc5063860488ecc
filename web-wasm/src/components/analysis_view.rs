//! 解析結果の表示

use leptos::prelude::*;
use tree_id_common::DisplayBlock;

#[component]
pub fn AnalysisView(blocks: Memo<Vec<DisplayBlock>>) -> impl IntoView {
    view! {
        <div class="analysis">
            {move || blocks.get().into_iter().map(render_block).collect_view()}
        </div>
    }
}

fn render_block(block: DisplayBlock) -> AnyView {
    let class = block_class(&block);
    match block {
        DisplayBlock::Heading { text } => view! { <h3 class=class>{text}</h3> }.into_any(),
        DisplayBlock::LabeledField { label, value } => view! {
            <p class=class>
                <span class="field-label">{format!("{}:", label)}</span>
                " "
                <span class="field-value">{value}</span>
            </p>
        }
        .into_any(),
        DisplayBlock::BulletItem { text } => view! { <p class=class>{format!("• {}", text)}</p> }.into_any(),
        DisplayBlock::Paragraph { text } => view! { <p class=class>{text}</p> }.into_any(),
    }
}

fn block_class(block: &DisplayBlock) -> &'static str {
    match block {
        DisplayBlock::Heading { .. } => "section-heading",
        DisplayBlock::LabeledField { .. } => "field",
        DisplayBlock::BulletItem { .. } => "bullet-item",
        DisplayBlock::Paragraph { .. } => "paragraph",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_classes_are_distinct() {
        let blocks = [
            DisplayBlock::Heading { text: String::new() },
            DisplayBlock::LabeledField { label: String::new(), value: String::new() },
            DisplayBlock::BulletItem { text: String::new() },
            DisplayBlock::Paragraph { text: String::new() },
        ];
        let mut classes: Vec<_> = blocks.iter().map(block_class).collect();
        classes.sort();
        classes.dedup();
        assert_eq!(classes.len(), blocks.len());
    }
}
