// Data structures for the remote catalog API.
// Field names on the wire are the upstream's (Spanish); Rust names describe what they hold.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Upstream sends `null` for unknown scalars; treat that like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Absent, null, false, 0, "" and "false" all mean "not pre-owned".
fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0")
        }
        _ => false,
    })
}

// Currency a listing is priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceCurrency {
    #[default]
    Local, // Soles
    Foreign, // Dollars
}

impl PriceCurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCurrency::Local => "sol",
            PriceCurrency::Foreign => "dolar",
        }
    }
}

impl Serialize for PriceCurrency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Anything that isn't "sol" is a dollar price, same as the storefront always treated it
impl<'de> Deserialize<'de> for PriceCurrency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("sol") {
            Ok(PriceCurrency::Local)
        } else {
            Ok(PriceCurrency::Foreign)
        }
    }
}

// Image kind in a listing's carousel; unknown, null or missing kinds are never shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageKind {
    #[serde(rename = "B")]
    Banner,
    #[serde(rename = "G")]
    Gallery,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    #[serde(rename = "idCarrusel", default)]
    pub id: i64,
    #[serde(rename = "imagen", default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: ImageKind,
    #[serde(rename = "color_id", default, deserialize_with = "null_as_default")]
    pub color_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "color_id", default, deserialize_with = "null_as_default")]
    pub color_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hex1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hex2: String,
    #[serde(rename = "name_color", default, deserialize_with = "null_as_default")]
    pub name: String,
}

// Technical sheet, shown on the detail page only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotoSpecs {
    #[serde(rename = "potencia", default, deserialize_with = "null_as_default")]
    pub power: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub torque: String,
    #[serde(rename = "combustible", default, deserialize_with = "null_as_default")]
    pub fuel: String,
    #[serde(rename = "tanque", default, deserialize_with = "null_as_default")]
    pub tank: String,
    #[serde(rename = "autonomia", default, deserialize_with = "null_as_default")]
    pub range: String,
    #[serde(rename = "velocidad", default, deserialize_with = "null_as_default")]
    pub top_speed: String,
    #[serde(rename = "suspension_delantero", default, deserialize_with = "null_as_default")]
    pub front_suspension: String,
    #[serde(rename = "suspension_posterior", default, deserialize_with = "null_as_default")]
    pub rear_suspension: String,
    #[serde(rename = "freno_delantero", default, deserialize_with = "null_as_default")]
    pub front_brake: String,
    #[serde(rename = "freno_posterior", default, deserialize_with = "null_as_default")]
    pub rear_brake: String,
    #[serde(rename = "peso", default, deserialize_with = "null_as_default")]
    pub weight: String,
    #[serde(rename = "carga", default, deserialize_with = "null_as_default")]
    pub load: String,
    #[serde(rename = "largo", default, deserialize_with = "null_as_default")]
    pub length: String,
    #[serde(rename = "ancho", default, deserialize_with = "null_as_default")]
    pub width: String,
    #[serde(rename = "alto", default, deserialize_with = "null_as_default")]
    pub height: String,
    #[serde(rename = "texto", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: String,
}

// One motorcycle in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotoListing {
    #[serde(rename = "idModelo", default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(rename = "marca", default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(rename = "modelo", default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(rename = "categoria", default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename = "logo", default, deserialize_with = "null_as_default")]
    pub logo_url: String,
    #[serde(rename = "imagen", default, deserialize_with = "null_as_default")]
    pub image_url: String,
    // Free text such as "149.5 cc"
    #[serde(rename = "cilindrada", default, deserialize_with = "null_as_default")]
    pub displacement: String,
    // Free text km/gal
    #[serde(rename = "rendimiento", default, deserialize_with = "null_as_default")]
    pub performance: String,
    #[serde(rename = "precio", default, deserialize_with = "null_as_default")]
    pub price_local: f64,
    #[serde(rename = "price_dollar", default, deserialize_with = "null_as_default")]
    pub price_foreign: f64,
    #[serde(rename = "currency", default)]
    pub price_currency: PriceCurrency,
    #[serde(rename = "transmision", default, deserialize_with = "null_as_default")]
    pub transmission: String,
    #[serde(rename = "isPreOwned", default, deserialize_with = "truthy_flag")]
    pub is_pre_owned: bool,
    // Weekly installment advertised on cards
    #[serde(default, deserialize_with = "null_as_default")]
    pub fee_amount: f64,
    #[serde(rename = "colores", default, deserialize_with = "null_as_default")]
    pub colors: Vec<Color>,
    #[serde(rename = "carrusels", default, deserialize_with = "null_as_default")]
    pub images: Vec<GalleryImage>,
    #[serde(flatten)]
    pub specs: MotoSpecs,
}

impl MotoListing {
    // Price in whichever currency the listing designates, never converted
    pub fn effective_price(&self) -> f64 {
        match self.price_currency {
            PriceCurrency::Local => self.price_local,
            PriceCurrency::Foreign => self.price_foreign,
        }
    }

    pub fn banner_images(&self) -> impl Iterator<Item = &GalleryImage> {
        self.images.iter().filter(|img| img.kind == ImageKind::Banner)
    }

    pub fn gallery_images(&self) -> impl Iterator<Item = &GalleryImage> {
        self.images.iter().filter(|img| img.kind == ImageKind::Gallery)
    }

    // First banner image belonging to one of the listing's colors, in color order
    pub fn primary_banner(&self) -> Option<&GalleryImage> {
        self.colors.iter().find_map(|color| {
            self.banner_images().find(|img| img.color_id == color.color_id)
        })
    }

    pub fn has_color_image(&self, color_id: i64) -> bool {
        self.banner_images().any(|img| img.color_id == color_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "idMarca", default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "marca", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "logo", default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "idCategoria", default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "categoria", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "icono", default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    // Listing code the banner links to, may be empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dealer {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "truthy_flag")]
    pub allow_pre_owned: bool,
    #[serde(default, deserialize_with = "truthy_flag")]
    pub allow_cash_sales: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub whatsapp_sales_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing_json() -> serde_json::Value {
        json!({
            "idModelo": 7,
            "code": "XR-150",
            "marca": "Honda",
            "modelo": "XR 150L",
            "categoria": "Enduro - Cross",
            "logo": "https://cdn.example.com/honda.png",
            "cilindrada": "149.2 cc",
            "rendimiento": "110",
            "precio": 12990.0,
            "price_dollar": 3450.0,
            "currency": "sol",
            "transmision": "Mecánica",
            "potencia": "12.5 HP",
            "fee_amount": 89,
            "video": null,
            "colores": [
                {"modelo": "XR 150L", "color_id": 2, "hex1": "#fff", "hex2": "#000", "name_color": "Blanco"},
                {"modelo": "XR 150L", "color_id": 5, "hex1": "#f00", "hex2": "#f00", "name_color": "Rojo"}
            ],
            "carrusels": [
                {"idCarrusel": 1, "idModelo": 7, "imagen": "g1.png", "type": "G", "color_id": 2},
                {"idCarrusel": 2, "idModelo": 7, "imagen": "red.png", "type": "B", "color_id": 5},
                {"idCarrusel": 3, "idModelo": 7, "imagen": "white.png", "type": "B", "color_id": 2}
            ]
        })
    }

    #[test]
    fn missing_pre_owned_flag_defaults_to_false() {
        let moto: MotoListing = serde_json::from_value(listing_json()).unwrap();
        assert!(!moto.is_pre_owned);
        assert_eq!(moto.specs.power, "12.5 HP");
        assert_eq!(moto.specs.video, "");
    }

    #[test]
    fn pre_owned_flag_accepts_loose_values() {
        for (raw, expected) in [
            (json!(true), true),
            (json!("True"), true),
            (json!(1), true),
            (json!(null), false),
            (json!(""), false),
            (json!("false"), false),
            (json!(0), false),
        ] {
            let mut value = listing_json();
            value["isPreOwned"] = raw.clone();
            let moto: MotoListing = serde_json::from_value(value).unwrap();
            assert_eq!(moto.is_pre_owned, expected, "isPreOwned = {raw}");
        }
    }

    #[test]
    fn effective_price_follows_currency() {
        let mut moto: MotoListing = serde_json::from_value(listing_json()).unwrap();
        assert_eq!(moto.price_currency, PriceCurrency::Local);
        assert_eq!(moto.effective_price(), 12990.0);

        moto.price_currency = PriceCurrency::Foreign;
        assert_eq!(moto.effective_price(), 3450.0);
    }

    #[test]
    fn any_non_sol_currency_is_foreign() {
        let mut value = listing_json();
        value["currency"] = json!("Dolar");
        let moto: MotoListing = serde_json::from_value(value).unwrap();
        assert_eq!(moto.price_currency, PriceCurrency::Foreign);

        value = listing_json();
        value["currency"] = json!("SOL");
        let moto: MotoListing = serde_json::from_value(value).unwrap();
        assert_eq!(moto.price_currency, PriceCurrency::Local);
    }

    #[test]
    fn primary_banner_follows_color_order() {
        let moto: MotoListing = serde_json::from_value(listing_json()).unwrap();
        // White (color 2) is listed first, so its banner wins even though red comes first in the carousel
        assert_eq!(moto.primary_banner().map(|img| img.url.as_str()), Some("white.png"));
        assert!(moto.has_color_image(5));
        assert!(!moto.has_color_image(9));
        assert_eq!(moto.gallery_images().count(), 1);
    }

    #[test]
    fn malformed_nested_entries_do_not_reject_the_list() {
        let mut broken = listing_json();
        broken["code"] = json!("XR-190");
        broken["idModelo"] = json!(null);
        broken["carrusels"] = json!([
            {"idCarrusel": 4, "imagen": "a.png", "type": null, "color_id": 2},
            {"idCarrusel": 5, "imagen": "b.png", "color_id": null},
            {"idCarrusel": 6, "imagen": "c.png", "type": "B", "color_id": 2}
        ]);
        broken["colores"] = json!([
            {"color_id": null, "hex1": "#fff", "hex2": "#fff", "name_color": "Blanco"},
            {"color_id": 2, "hex1": "#000", "hex2": "#000", "name_color": "Negro"}
        ]);

        let motos: Vec<MotoListing> = serde_json::from_value(json!([listing_json(), broken])).unwrap();
        assert_eq!(motos.len(), 2);
        let broken = &motos[1];
        assert_eq!(broken.id, 0);
        assert_eq!(broken.images[0].kind, ImageKind::Other);
        assert_eq!(broken.images[1].kind, ImageKind::Other);
        assert_eq!(broken.images[1].color_id, 0);
        assert_eq!(broken.colors[0].color_id, 0);
        assert_eq!(broken.banner_images().count(), 1);
        assert_eq!(broken.primary_banner().map(|img| img.url.as_str()), Some("c.png"));
    }

    #[test]
    fn dealer_flags_parse_from_strings() {
        let dealer: Dealer = serde_json::from_value(json!({
            "id": "3",
            "name": "Global Go Lima",
            "slug": "lima",
            "allow_pre_owned": "True",
            "allow_cash_sales": "False",
            "whatsapp_sales_number": "51999999999"
        }))
        .unwrap();
        assert!(dealer.allow_pre_owned);
        assert!(!dealer.allow_cash_sales);
    }
}
