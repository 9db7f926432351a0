//! Outbound search links to used-car marketplaces for a catalog model.

fn slug(value: &str, separator: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn webmotors_url(brand: &str, model: &str) -> String {
    format!(
        "https://www.webmotors.com.br/carros/estoque/{}/{}",
        slug(&brand.to_lowercase(), "-"),
        slug(&model.to_lowercase(), "-")
    )
}

pub fn olx_url(brand: &str, model: &str) -> String {
    let query = slug(&format!("{brand} {model}"), "%20");
    format!(
        "https://www.olx.com.br/autos-e-pecas/carros-vans-e-utilitarios/{}?q={}",
        brand.to_lowercase(),
        query
    )
}

pub fn mercado_livre_url(brand: &str, model: &str) -> String {
    let query = slug(&format!("{brand} {model}"), "-");
    format!(
        "https://lista.mercadolivre.com.br/veiculos/carros-caminhonetes/{}/{}",
        brand.to_lowercase(),
        query
    )
}
