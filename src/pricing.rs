// Price formatting, financing quotes and outbound financing links

use reqwest::Url;

use crate::models::{MotoListing, PriceCurrency};

// Terms used for the "from X per month" quote on every card
pub const QUOTE_ANNUAL_RATE_PERCENT: f64 = 20.0;
pub const QUOTE_MONTHS: u32 = 24;

// Groups the integer part with commas and keeps one or two decimals
fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = if fraction % 10 == 0 {
        (fraction / 10).to_string()
    } else {
        format!("{:02}", fraction)
    };
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// `S/ 12,990.0` for soles, `$3,450.5` for dollars.
pub fn format_price(amount: f64, currency: PriceCurrency) -> String {
    match currency {
        PriceCurrency::Local => format!("S/ {}", format_amount(amount)),
        PriceCurrency::Foreign => format!("${}", format_amount(amount)),
    }
}

/// Fixed installment of an amortized loan: `P·r(1+r)^n / ((1+r)^n − 1)` with
/// `r` the monthly rate.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    let rate = annual_rate_percent / 12.0 / 100.0;
    if rate == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + rate).powi(months as i32);
    principal * (rate * growth) / (growth - 1.0)
}

// Monthly quote shown on cards, in the listing's own currency
pub fn monthly_quote(moto: &MotoListing) -> f64 {
    monthly_payment(moto.effective_price(), QUOTE_ANNUAL_RATE_PERCENT, QUOTE_MONTHS)
}

/// Link to the financing request form, prefilled with model, price and code.
///
/// Returns `None` when the configured base isn't a valid URL.
pub fn financing_link(financing_url: &str, moto: &MotoListing) -> Option<String> {
    let price = moto.price_local.to_string();
    Url::parse_with_params(
        financing_url,
        &[
            ("modelo", moto.model.as_str()),
            ("precio", price.as_str()),
            ("codigo", moto.code.as_str()),
        ],
    )
    .map(String::from)
    .ok()
}

// Detail page on the parent site, used when the catalog is embedded in an iframe
pub fn embedded_detail_link(moto_detail_url: &str, code: &str) -> Option<String> {
    Url::parse_with_params(moto_detail_url, &[("codigoMoto", code)])
        .map(String::from)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::listing;

    #[test]
    fn formats_with_grouping_and_short_fraction() {
        assert_eq!(format_price(12000.0, PriceCurrency::Local), "S/ 12,000.0");
        assert_eq!(format_price(1234.5, PriceCurrency::Foreign), "$1,234.5");
        assert_eq!(format_price(610.7496, PriceCurrency::Local), "S/ 610.75");
        assert_eq!(format_price(999.999, PriceCurrency::Foreign), "$1,000.0");
        assert_eq!(format_price(1234567.05, PriceCurrency::Local), "S/ 1,234,567.05");
        assert_eq!(format_price(0.0, PriceCurrency::Local), "S/ 0.0");
    }

    #[test]
    fn amortized_payment_matches_reference_values() {
        assert!((monthly_payment(12000.0, 20.0, 24) - 610.7496).abs() < 1e-3);
        assert!((monthly_payment(7990.0, 20.0, 24) - 406.6575).abs() < 1e-3);
        assert_eq!(monthly_payment(2400.0, 0.0, 24), 100.0);
        assert_eq!(monthly_payment(2400.0, 20.0, 0), 2400.0);
    }

    #[test]
    fn quote_uses_effective_price() {
        let mut moto = listing(1, "Honda", 12000.0);
        moto.price_currency = PriceCurrency::Foreign;
        moto.price_foreign = 3450.0;
        assert!((monthly_quote(&moto) - 175.5905).abs() < 1e-3);
    }

    #[test]
    fn financing_link_encodes_parameters() {
        let mut moto = listing(4, "Honda", 7990.0);
        moto.model = "XR 150L".to_string();
        let link = financing_link("https://example.com/solicitar-financiamiento", &moto).unwrap();
        assert_eq!(
            link,
            "https://example.com/solicitar-financiamiento?modelo=XR+150L&precio=7990&codigo=MOTO-4"
        );
        assert!(financing_link("not a url", &moto).is_none());
    }

    #[test]
    fn embedded_detail_link_carries_code() {
        assert_eq!(
            embedded_detail_link("https://example.com/catalogo", "PCX-160").as_deref(),
            Some("https://example.com/catalogo?codigoMoto=PCX-160")
        );
    }
}
