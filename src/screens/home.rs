/// Static marketing content for `/`
pub struct Home;

impl Home {
    pub const TITLE: &'static str = "Hestia";
    pub const TAGLINE: &'static str = "Share the recipes that bring people to your table.";

    pub fn highlights() -> &'static [&'static str] {
        &[
            "Search recipes by name or by what is already in your fridge",
            "Keep every family recipe in one kitchen",
            "Share your best dishes with friends",
        ]
    }
}
