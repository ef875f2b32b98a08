//! Built-in catalog used when no data file or API is configured.

use crate::catalog::{Category, ProductType, SizeEntry, Variant};

const VALVES: &str = "/imagens/valvulas-industriais";
const TEES: &str = "/imagens/conexoes-tubulares/te-90";

/// The bundled catalog: two categories, one product of every shape.
pub fn seed_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Válvulas Industriais", "valvulas-industriais")
            .with_description(
                "Linha completa de válvulas para aplicações industriais de alta performance.",
            )
            .with_image("/imagens/valvulas.png")
            .with_product(ball_valve())
            .with_product(gate_valve())
            .with_product(check_valve()),
        Category::new("2", "Conexões Tubulares", "conexoes-tubulares")
            .with_description("Conexões e acessórios para sistemas de tubulação industrial.")
            .with_image("/imagens/conexoes.png")
            .with_product(
                ProductType::new("4", "Flanges", "flanges")
                    .with_description("Flanges para conexão de tubulações industriais.")
                    .with_image("/imagens/flanges.png"),
            )
            .with_product(reducing_tee()),
    ]
}

fn ball_valve_variant(
    kind: &str,
    file_slug: &str,
    description: &str,
    sizes: &[(&str, &str)],
) -> Variant {
    let mut variant = Variant::new(kind).with_description(description);
    variant.sizes = sizes
        .iter()
        .map(|(label, file)| {
            SizeEntry::new(
                *label,
                format!("{VALVES}/valvula-esfera-{file_slug}-{file}.jpg"),
            )
            .with_description(format!("Válvula de esfera {} {}", kind.to_lowercase(), label))
        })
        .collect();
    variant
}

fn ball_valve() -> ProductType {
    ProductType::new("1", "Válvula de Esfera", "valvula-esfera")
        .with_description(
            "Válvulas de esfera para controle de fluxo em sistemas industriais. \
             Alta durabilidade e confiabilidade. Ideal para aplicações que exigem \
             controle preciso e vedação hermética.",
        )
        .with_spec("Pressão Máxima", "150 PSI")
        .with_spec("Temperatura de Operação", "-20°C a 200°C")
        .with_spec("Tipo de Conexão", "Rosqueada / Flangeada")
        .with_spec("Vedação", "Teflon (PTFE)")
        .with_applications(&[
            "Refinarias de petróleo",
            "Indústria química",
            "Siderúrgicas",
            "Sistemas de água e esgoto",
            "Indústria alimentícia",
        ])
        .with_standards(&["ASME B16.34", "API 600", "ISO 5211"])
        .with_variant(ball_valve_variant(
            "Aço Carbono",
            "aco-carbono",
            "Ideal para aplicações gerais com boa relação custo-benefício.",
            &[("1/2\"", "1-2"), ("1\"", "1"), ("2\"", "2")],
        ))
        .with_variant(ball_valve_variant(
            "Inox",
            "inox",
            "Resistente à corrosão, ideal para ambientes agressivos.",
            &[("1/2\"", "1-2"), ("1\"", "1"), ("2\"", "2")],
        ))
        .with_variant(ball_valve_variant(
            "Latão",
            "latao",
            "Excelente para aplicações residenciais e comerciais.",
            &[("1/2\"", "1-2"), ("3/4\"", "3-4")],
        ))
}

fn gate_valve() -> ProductType {
    ProductType::new("2", "Válvula de Gaveta", "valvula-gaveta")
        .with_description("Válvulas de gaveta para controle de fluxo em sistemas de alta pressão.")
        .with_variant(
            Variant::new("Aço Carbono")
                .with_size("2\"", format!("{VALVES}/valvula-gaveta-aco-carbono-2.jpg"))
                .with_size("3\"", format!("{VALVES}/valvula-gaveta-aco-carbono-3.jpg"))
                .with_size("4\"", format!("{VALVES}/valvula-gaveta-aco-carbono-4.jpg")),
        )
        .with_variant(
            Variant::new("Inox")
                .with_size("2\"", format!("{VALVES}/valvula-gaveta-inox-2.jpg"))
                .with_size("3\"", format!("{VALVES}/valvula-gaveta-inox-3.jpg")),
        )
}

fn check_valve() -> ProductType {
    ProductType::new("3", "Válvula de Retenção", "valvula-retencao")
        .with_description("Válvulas de retenção para prevenir refluxo em sistemas de bombeamento.")
        .with_image(format!("{VALVES}/valvula-retencao.jpg"))
        .with_size("1\"", format!("{VALVES}/valvula-retencao-1.jpg"))
        .with_size("2\"", format!("{VALVES}/valvula-retencao-2.jpg"))
        .with_size("3\"", format!("{VALVES}/valvula-retencao-3.jpg"))
}

fn reducing_tee() -> ProductType {
    ProductType::new("5", "Tês 90", "tes-90")
        .with_description("Tês e reduções para sistemas de tubulação.")
        .with_variant(
            Variant::new("Aço Carbono")
                .with_size("1\" x 1/2\"", format!("{TEES}/te-reducao-aco-1x1-2.jpg"))
                .with_size("2\" x 1\"", format!("{TEES}/te-reducao-aco-2x1.jpg")),
        )
}
