//! プロンプトと組み込みレポート
//!
//! CLIとWeb(WASM)で共有される固定テキスト:
//! - REPORT_SECTIONS: レポートの5セクション
//! - build_identification_prompt: 樹木識別用プロンプト
//! - DEFAULT_REPORT: 同梱デフォルト画像の解説（起動時に表示）

/// レポートのセクション（この順で番号付き出力を要求する）
pub const REPORT_SECTIONS: &[&str] = &[
    "Species Identification",
    "Physical Characteristics",
    "Growth Requirements",
    "Ecological Information",
    "Additional Notes",
];

/// 樹木識別プロンプト生成
///
/// 出力は行単位のプレーンテキスト。`- label: value` 形式を指定しておくと
/// 整形側でラベル付き項目として拾える。
pub fn build_identification_prompt() -> String {
    let sections = REPORT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}:", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a botanist helping students learn about trees. Analyze the tree in this photo for educational purposes only.

Respond in plain text using exactly these numbered sections:
{sections}

Under "Species Identification" include:
- Common name: ...
- Scientific name: ...
- Family: ...
- Confidence: high / medium / low

Under "Physical Characteristics" describe leaves, bark, shape, height and any flowers, fruit or seeds visible.
Under "Growth Requirements" cover climate, soil, sunlight and water.
Under "Ecological Information" cover native range, wildlife value and environmental role.
Under "Additional Notes" add interesting facts, and say so plainly if the photo is unclear or may not show a tree.

Write each detail on its own line starting with "- ". Use "- label: value" when the line names a property.
Do not use markdown headings, bold text or tables.
This information is for educational purposes only and must not be relied on for safety decisions such as foraging or tree removal."#
    )
}

/// 同梱デフォルト画像（アカガシワ）の解説
pub const DEFAULT_REPORT: &str = "\
1. Species Identification:
- Common name: Northern Red Oak
- Scientific name: Quercus rubra
- Family: Fagaceae
- Confidence: high

2. Physical Characteristics:
- Leaves: 12-20 cm long with 7-11 bristle-tipped lobes
- Bark: dark grey with shiny vertical ridges on mature trees
- Height: typically 20-30 m with a rounded crown
- Fruit: acorns with a shallow, saucer-shaped cap

3. Growth Requirements:
- Climate: temperate, hardy to USDA zones 3-8
- Soil: well-drained, slightly acidic loam
- Sunlight: full sun to partial shade
- Water: moderate; tolerates short droughts once established

4. Ecological Information:
- Native range: eastern and central North America
- Acorns provide food for deer, squirrels, jays and turkeys
- Hosts hundreds of species of moths and butterflies

5. Additional Notes:
Red oak is one of the fastest-growing oaks and is widely planted as a street tree.
Leaves turn russet to bright red in autumn.
- This information is for educational purposes only.
";
