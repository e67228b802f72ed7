// Template structs and the presenters that fill them from catalog data

use askama::Template;

use crate::{
    catalog_api::CatalogData,
    catalog_query::{CATALOG_PATH, CatalogQuery, catalog_href, detail_path},
    config::Settings,
    filters::{FilterState, PreOwnedTab, SortOrder, TRANSMISSION_TYPES, compute_view},
    models::{Banner, MotoListing, PriceCurrency},
    pagination::PageLink,
    pricing,
};

pub const SITE_NAME: &str = "Global Go";
pub const PLACEHOLDER_IMAGE: &str = "/static/imgs/moto.svg";

// --- View Models ---

pub struct ChipView {
    pub label: String,
    pub href: String,
    pub selected: bool,
    pub image: Option<String>,
}

pub struct TabView {
    pub label: &'static str,
    pub href: String,
    pub selected: bool,
}

pub struct SortOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

// A numbered link, or an ellipsis when `href` is None
pub struct PageLinkView {
    pub label: String,
    pub href: Option<String>,
    pub current: bool,
}

pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

pub struct ColorSwatch {
    pub name: String,
    pub gradient: String,
}

pub struct BannerView {
    pub image: String,
    pub href: Option<String>,
    pub description: String,
}

// Current values of the numeric inputs, empty when unset
#[derive(Default)]
pub struct RangeInputs {
    pub price_min: String,
    pub price_max: String,
    pub cc_min: String,
    pub cc_max: String,
    pub perf_min: String,
    pub perf_max: String,
}

pub struct MotoCardView {
    pub code: String,
    pub model: String,
    pub brand: String,
    pub brand_logo: String,
    pub category_label: String,
    pub badge_class: &'static str,
    pub image: String,
    pub price: String,
    pub monthly: String,
    pub weekly_fee: Option<String>,
    pub displacement: String,
    pub performance: String,
    pub transmission: String,
    pub pre_owned: bool,
    pub detail_href: String,
    pub embedded_href: String,
    pub financing_href: String,
    pub colors: Vec<ColorSwatch>,
}

pub struct SpecRow {
    pub label: &'static str,
    pub value: String,
}

pub struct SpecSection {
    pub title: &'static str,
    pub rows: Vec<SpecRow>,
}

// --- Templates ---

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub title: String,
    pub banners: Vec<BannerView>,
    pub search: String,
    pub sort_options: Vec<SortOptionView>,
    pub tabs: Vec<TabView>,
    pub brand_chips: Vec<ChipView>,
    pub category_chips: Vec<ChipView>,
    pub transmission_chips: Vec<ChipView>,
    pub ranges: RangeInputs,
    pub hidden_fields: Vec<HiddenField>,
    pub has_active_filters: bool,
    pub clear_href: String,
    pub cards: Vec<MotoCardView>,
    pub total_count: usize,
    pub pagination: Vec<PageLinkView>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailTemplate {
    pub title: String,
    pub card: MotoCardView,
    pub gallery: Vec<String>,
    pub spec_sections: Vec<SpecSection>,
    pub description: String,
    pub video: Option<String>,
    pub back_href: &'static str,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub title: String,
    pub code: String,
    pub back_href: &'static str,
}

// --- Presenters ---

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Badge color per known category, grey otherwise
fn badge_class(category: &str) -> &'static str {
    match category {
        "Touring - Viajeras" => "badge badge-purple",
        "Enduro - Cross" => "badge badge-yellow",
        "Deportiva" => "badge badge-red",
        "Pistera" => "badge badge-green",
        "Scooter" => "badge badge-orange",
        "Doble proposito - Todo Terreno" => "badge badge-dark",
        "Café Racer" => "badge badge-brown",
        _ => "badge badge-grey",
    }
}

fn format_bound(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl MotoCardView {
    pub fn from_listing(moto: &MotoListing, settings: &Settings) -> Self {
        let detail_href = detail_path(&moto.code);
        let image = moto
            .primary_banner()
            .map(|img| img.url.clone())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        let colors = moto
            .colors
            .iter()
            .filter(|color| moto.has_color_image(color.color_id))
            .map(|color| ColorSwatch {
                name: color.name.clone(),
                gradient: format!("linear-gradient(to right, {}, {})", color.hex1, color.hex2),
            })
            .collect();

        // Weekly fees are always quoted in soles
        let weekly_fee = (moto.fee_amount > 0.0).then(|| pricing::format_price(moto.fee_amount, PriceCurrency::Local));

        Self {
            code: moto.code.clone(),
            model: moto.model.clone(),
            brand: moto.brand.clone(),
            brand_logo: moto.logo_url.clone(),
            category_label: title_case(&moto.category),
            badge_class: badge_class(&moto.category),
            image,
            price: pricing::format_price(moto.effective_price(), moto.price_currency),
            monthly: pricing::format_price(pricing::monthly_quote(moto), moto.price_currency),
            weekly_fee,
            displacement: moto.displacement.clone(),
            performance: moto.performance.clone(),
            transmission: moto.transmission.clone(),
            pre_owned: moto.is_pre_owned,
            embedded_href: pricing::embedded_detail_link(&settings.moto_detail_url, &moto.code)
                .unwrap_or_else(|| detail_href.clone()),
            financing_href: pricing::financing_link(&settings.financing_url, moto)
                .unwrap_or_else(|| settings.financing_url.clone()),
            detail_href,
            colors,
        }
    }
}

fn banner_view(banner: &Banner) -> BannerView {
    let code = banner.code.trim();
    BannerView {
        image: banner.url.clone(),
        href: (!code.is_empty()).then(|| detail_path(code)),
        description: banner.description.clone(),
    }
}

// Chips for one dimension; each links to the state with that value toggled
fn chips<'a>(
    values: impl Iterator<Item = (&'a str, Option<&'a str>)>,
    filters: &FilterState,
    page: usize,
    dealer: Option<&str>,
    is_selected: impl Fn(&FilterState, &str) -> bool,
    toggle: impl Fn(&mut FilterState, &str),
) -> Vec<ChipView> {
    values
        .map(|(value, image)| {
            let mut toggled = filters.clone();
            toggle(&mut toggled, value);
            ChipView {
                label: value.to_string(),
                href: catalog_href(&toggled, page, dealer),
                selected: is_selected(filters, value),
                image: image.map(String::from),
            }
        })
        .collect()
}

fn pagination_links(filters: &FilterState, links: &[PageLink], current: usize, dealer: Option<&str>) -> Vec<PageLinkView> {
    links
        .iter()
        .map(|link| match link {
            PageLink::Page(n) => PageLinkView {
                label: n.to_string(),
                href: Some(catalog_href(filters, *n, dealer)),
                current: *n == current,
            },
            PageLink::Ellipsis => PageLinkView {
                label: "...".to_string(),
                href: None,
                current: false,
            },
        })
        .collect()
}

/// Builds the catalog page for one request from the fetched data and the
/// filters encoded in the query string.
pub fn catalog_page(data: &CatalogData, query: &CatalogQuery, settings: &Settings) -> CatalogTemplate {
    let filters = query.filter_state();
    let dealer = query.dealer();
    let view = compute_view(&data.motorcycles, &filters, query.page(), settings.items_per_page);
    let page = view.pagination.current_page;

    let brand_chips = chips(
        data.brands.iter().map(|b| (b.name.as_str(), b.logo_url.as_deref())),
        &filters,
        page,
        dealer,
        |f, v| f.brands.contains(v),
        FilterState::toggle_brand,
    );
    let category_chips = chips(
        data.categories.iter().map(|c| (c.name.as_str(), None)),
        &filters,
        page,
        dealer,
        |f, v| f.categories.contains(v),
        FilterState::toggle_category,
    );
    let transmission_chips = chips(
        TRANSMISSION_TYPES.iter().map(|t| (*t, None)),
        &filters,
        page,
        dealer,
        |f, v| f.transmissions.contains(v),
        FilterState::toggle_transmission,
    );

    let tabs = [
        (PreOwnedTab::All, "Todas"),
        (PreOwnedTab::New, "Nuevas"),
        (PreOwnedTab::UsedOnly, "Seminuevas"),
    ]
    .into_iter()
    .map(|(tab, label)| {
        let switched = FilterState {
            pre_owned_tab: tab,
            ..filters.clone()
        };
        TabView {
            label,
            href: catalog_href(&switched, page, dealer),
            selected: filters.pre_owned_tab == tab,
        }
    })
    .collect();

    let sort_options = [
        (SortOrder::PriceDesc, "Precio: Mayor a Menor"),
        (SortOrder::PriceAsc, "Precio: Menor a Mayor"),
    ]
    .into_iter()
    .map(|(order, label)| SortOptionView {
        value: order.as_param(),
        label,
        selected: filters.sort_order == order,
    })
    .collect();

    // The filter form only carries sort, search and ranges; chips, tab and dealer ride along hidden
    let mut hidden_fields = Vec::new();
    for (name, set) in [
        ("brands", &filters.brands),
        ("categories", &filters.categories),
        ("transmissions", &filters.transmissions),
    ] {
        if !set.is_empty() {
            hidden_fields.push(HiddenField {
                name,
                value: set.iter().cloned().collect::<Vec<_>>().join(","),
            });
        }
    }
    if filters.pre_owned_tab != PreOwnedTab::All {
        hidden_fields.push(HiddenField {
            name: "tab",
            value: filters.pre_owned_tab.as_param().to_string(),
        });
    }
    if let Some(dealer) = dealer {
        hidden_fields.push(HiddenField {
            name: "dealer",
            value: dealer.to_string(),
        });
    }

    let ranges = RangeInputs {
        price_min: format_bound(filters.price.min),
        price_max: format_bound(filters.price.max),
        cc_min: format_bound(filters.displacement.min),
        cc_max: format_bound(filters.displacement.max),
        perf_min: format_bound(filters.performance.min),
        perf_max: format_bound(filters.performance.max),
    };

    let mut cleared = filters.clone();
    cleared.clear();

    let pagination_state = view.pagination;
    let pagination = pagination_links(&filters, &pagination_state.window(), page, dealer);
    let prev_href = pagination_state
        .has_previous()
        .then(|| catalog_href(&filters, page - 1, dealer));
    let next_href = pagination_state
        .has_next()
        .then(|| catalog_href(&filters, page + 1, dealer));

    CatalogTemplate {
        title: format!("Catalogo de motos | {}", SITE_NAME),
        banners: data.banners.iter().map(banner_view).collect(),
        search: filters.search_term().unwrap_or_default().to_string(),
        sort_options,
        tabs,
        brand_chips,
        category_chips,
        transmission_chips,
        ranges,
        hidden_fields,
        has_active_filters: filters.has_active_filters(),
        clear_href: catalog_href(&cleared, 1, dealer),
        cards: view
            .visible
            .iter()
            .map(|moto| MotoCardView::from_listing(moto, settings))
            .collect(),
        total_count: view.total_count,
        pagination,
        prev_href,
        next_href,
    }
}

fn spec_section(title: &'static str, rows: &[(&'static str, &str)]) -> Option<SpecSection> {
    let rows: Vec<SpecRow> = rows
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| SpecRow {
            label: *label,
            value: value.trim().to_string(),
        })
        .collect();
    (!rows.is_empty()).then_some(SpecSection { title, rows })
}

/// Technical sheet grouped the way the detail page shows it, empty values skipped.
pub fn spec_sections(moto: &MotoListing) -> Vec<SpecSection> {
    let specs = &moto.specs;
    let dimensions = [specs.length.trim(), specs.width.trim(), specs.height.trim()]
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" x ");

    [
        spec_section(
            "Motor",
            &[
                ("Cilindrada", moto.displacement.as_str()),
                ("Potencia", specs.power.as_str()),
                ("Torque", specs.torque.as_str()),
            ],
        ),
        spec_section(
            "Combustible",
            &[
                ("Combustible", specs.fuel.as_str()),
                ("Tanque", specs.tank.as_str()),
                ("Rendimiento", moto.performance.as_str()),
                ("Autonomía", specs.range.as_str()),
            ],
        ),
        spec_section(
            "Suspensión",
            &[
                ("Suspensión Delantera", specs.front_suspension.as_str()),
                ("Suspensión Trasera", specs.rear_suspension.as_str()),
            ],
        ),
        spec_section(
            "Transmisión",
            &[
                ("Transmisión", moto.transmission.as_str()),
                ("Velocidad Máxima", specs.top_speed.as_str()),
            ],
        ),
        spec_section(
            "Dimensiones",
            &[
                ("Peso", specs.weight.as_str()),
                ("Carga", specs.load.as_str()),
                ("Dimensiones", dimensions.as_str()),
            ],
        ),
        spec_section(
            "Frenos",
            &[
                ("Frenos Delanteros", specs.front_brake.as_str()),
                ("Frenos Traseros", specs.rear_brake.as_str()),
            ],
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn detail_page(moto: &MotoListing, settings: &Settings) -> DetailTemplate {
    let gallery = moto.gallery_images().map(|img| img.url.clone()).collect();
    let video = Some(moto.specs.video.trim())
        .filter(|v| !v.is_empty())
        .map(String::from);

    DetailTemplate {
        title: format!("{} {} | {}", moto.brand, moto.model, SITE_NAME),
        card: MotoCardView::from_listing(moto, settings),
        gallery,
        spec_sections: spec_sections(moto),
        description: moto.specs.description.clone(),
        video,
        back_href: CATALOG_PATH,
    }
}

pub fn not_found_page(code: &str) -> NotFoundTemplate {
    NotFoundTemplate {
        title: format!("Moto no encontrada | {}", SITE_NAME),
        code: code.to_string(),
        back_href: CATALOG_PATH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCatalog, listing};

    fn data() -> CatalogData {
        let fake = FakeCatalog::stocked();
        CatalogData {
            brands: fake.brands,
            categories: fake.categories,
            banners: fake.banners,
            motorcycles: fake.motorcycles,
        }
    }

    #[test]
    fn title_case_lowers_the_rest_of_each_word() {
        assert_eq!(title_case("ENDURO - cross"), "Enduro - Cross");
        assert_eq!(title_case("café racer"), "Café Racer");
    }

    #[test]
    fn unknown_category_gets_grey_badge() {
        assert_eq!(badge_class("Scooter"), "badge badge-orange");
        assert_eq!(badge_class("Cuatrimoto"), "badge badge-grey");
    }

    #[test]
    fn card_uses_color_banner_and_outbound_links() {
        let mut moto = listing(9, "Honda", 7990.0);
        moto.fee_amount = 45.0;
        let card = MotoCardView::from_listing(&moto, &Settings::default());

        assert_eq!(card.image, "https://cdn.example.com/banner-9.png");
        assert_eq!(card.price, "S/ 7,990.0");
        assert_eq!(card.weekly_fee.as_deref(), Some("S/ 45.0"));
        assert_eq!(card.detail_href, "/motos/MOTO-9");
        assert!(card.embedded_href.ends_with("catalogo?codigoMoto=MOTO-9"));
        assert!(card.financing_href.contains("codigo=MOTO-9"));
        assert_eq!(card.colors.len(), 1);
    }

    #[test]
    fn card_links_encode_the_code() {
        let mut moto = listing(9, "Honda", 7990.0);
        moto.code = "XR 150".to_string();
        let card = MotoCardView::from_listing(&moto, &Settings::default());
        assert_eq!(card.detail_href, "/motos/XR%20150");
    }

    #[test]
    fn card_without_banner_uses_placeholder() {
        let mut moto = listing(9, "Honda", 7990.0);
        moto.images.clear();
        let card = MotoCardView::from_listing(&moto, &Settings::default());
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
        assert!(card.colors.is_empty());
        assert!(card.weekly_fee.is_none());
    }

    #[test]
    fn catalog_page_marks_selected_chips_and_links_toggles() {
        let query = CatalogQuery {
            brands: Some("Honda".to_string()),
            ..CatalogQuery::default()
        };
        let page = catalog_page(&data(), &query, &Settings::default());

        assert_eq!(page.total_count, 2);
        let honda = &page.brand_chips[0];
        assert!(honda.selected);
        assert_eq!(honda.href, "/motos");
        let yamaha = &page.brand_chips[1];
        assert!(!yamaha.selected);
        assert_eq!(yamaha.href, "/motos?brands=Honda%2CYamaha");
        assert!(page.has_active_filters);
        assert_eq!(page.clear_href, "/motos");
        assert_eq!(page.hidden_fields.len(), 1);
    }

    #[test]
    fn catalog_page_paginates_with_configured_size() {
        let settings = Settings {
            items_per_page: 2,
            ..Settings::default()
        };
        let query = CatalogQuery {
            page: Some("2".to_string()),
            ..CatalogQuery::default()
        };
        let page = catalog_page(&data(), &query, &settings);

        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].code, "MOTO-2");
        assert_eq!(page.prev_href.as_deref(), Some("/motos"));
        assert!(page.next_href.is_none());
        assert_eq!(page.pagination.len(), 2);
        assert!(page.pagination[1].current);
    }

    #[test]
    fn detail_sections_skip_empty_values() {
        let mut moto = listing(3, "Honda", 5400.0);
        moto.specs.length = "2000 mm".to_string();
        moto.specs.height = "1100 mm".to_string();
        let sections = spec_sections(&moto);

        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Motor", "Combustible", "Transmisión", "Dimensiones"]);
        let dimensions = sections.iter().find(|s| s.title == "Dimensiones").unwrap();
        assert_eq!(dimensions.rows[0].value, "2000 mm x 1100 mm");
    }

    #[test]
    fn templates_render() {
        let data = data();
        let settings = Settings::default();
        let html = catalog_page(&data, &CatalogQuery::default(), &settings).render().unwrap();
        assert!(html.contains("Moto 3"));
        assert!(html.contains("5,400.0"));

        let html = detail_page(&data.motorcycles[0], &settings).render().unwrap();
        assert!(html.contains("Moto 1"));
        assert!(html.contains("Potencia"));

        let html = not_found_page("NOPE").render().unwrap();
        assert!(html.contains("NOPE"));
    }
}
