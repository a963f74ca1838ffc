use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "detached-house")]
    DetachedHouse,
    #[serde(rename = "semi-detached")]
    SemiDetached,
    #[serde(rename = "terraced")]
    Terraced,
    #[serde(rename = "end-terrace")]
    EndTerrace,
    #[serde(rename = "bungalow")]
    Bungalow,
    #[serde(rename = "flat-purpose")]
    FlatPurposeBuilt,
    #[serde(rename = "flat-converted")]
    FlatConverted,
    #[serde(rename = "maisonette")]
    Maisonette,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::DetachedHouse,
            Self::SemiDetached,
            Self::Terraced,
            Self::EndTerrace,
            Self::Bungalow,
            Self::FlatPurposeBuilt,
            Self::FlatConverted,
            Self::Maisonette,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::DetachedHouse => "detached-house",
            Self::SemiDetached => "semi-detached",
            Self::Terraced => "terraced",
            Self::EndTerrace => "end-terrace",
            Self::Bungalow => "bungalow",
            Self::FlatPurposeBuilt => "flat-purpose",
            Self::FlatConverted => "flat-converted",
            Self::Maisonette => "maisonette",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DetachedHouse => "Detached House",
            Self::SemiDetached => "Semi-Detached House",
            Self::Terraced => "Terraced House",
            Self::EndTerrace => "End Terrace House",
            Self::Bungalow => "Bungalow",
            Self::FlatPurposeBuilt => "Flat (Purpose Built)",
            Self::FlatConverted => "Flat (Converted)",
            Self::Maisonette => "Maisonette",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tenure {
    OwnerOccupied,
    PrivateRental,
    SocialHousing,
}

impl Tenure {
    pub const fn ordered() -> [Self; 3] {
        [Self::OwnerOccupied, Self::PrivateRental, Self::SocialHousing]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::OwnerOccupied => "owner-occupied",
            Self::PrivateRental => "private-rental",
            Self::SocialHousing => "social-housing",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OwnerOccupied => "Owner Occupied",
            Self::PrivateRental => "Private Rental",
            Self::SocialHousing => "Social Housing",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::OwnerOccupied => "You own and live in the property",
            Self::PrivateRental => "You rent from a private landlord",
            Self::SocialHousing => "You rent from a council or housing association",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeatingType {
    GasBoiler,
    OilBoiler,
    ElectricStorage,
    ElectricPanel,
    LpgBoiler,
    Coal,
    HeatPump,
    #[serde(rename = "none")]
    NoCentralHeating,
}

impl HeatingType {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::GasBoiler,
            Self::OilBoiler,
            Self::ElectricStorage,
            Self::ElectricPanel,
            Self::LpgBoiler,
            Self::Coal,
            Self::HeatPump,
            Self::NoCentralHeating,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::GasBoiler => "gas-boiler",
            Self::OilBoiler => "oil-boiler",
            Self::ElectricStorage => "electric-storage",
            Self::ElectricPanel => "electric-panel",
            Self::LpgBoiler => "lpg-boiler",
            Self::Coal => "coal",
            Self::HeatPump => "heat-pump",
            Self::NoCentralHeating => "none",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GasBoiler => "Gas Boiler",
            Self::OilBoiler => "Oil Boiler",
            Self::ElectricStorage => "Electric Storage Heaters",
            Self::ElectricPanel => "Electric Panel Heaters",
            Self::LpgBoiler => "LPG Boiler",
            Self::Coal => "Coal or Solid Fuel",
            Self::HeatPump => "Heat Pump (Air or Ground Source)",
            Self::NoCentralHeating => "No Central Heating",
        }
    }

    /// Non-gas fossil or direct electric systems a heat pump can replace.
    pub const fn is_replaceable_non_gas(self) -> bool {
        matches!(
            self,
            Self::OilBoiler
                | Self::LpgBoiler
                | Self::Coal
                | Self::ElectricStorage
                | Self::ElectricPanel
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsulationOption {
    LoftFull,
    LoftPartial,
    CavityWall,
    SolidWallInternal,
    SolidWallExternal,
    Underfloor,
    #[serde(rename = "none")]
    NoInsulation,
    DontKnow,
}

impl InsulationOption {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::LoftFull,
            Self::LoftPartial,
            Self::CavityWall,
            Self::SolidWallInternal,
            Self::SolidWallExternal,
            Self::Underfloor,
            Self::NoInsulation,
            Self::DontKnow,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::LoftFull => "loft-full",
            Self::LoftPartial => "loft-partial",
            Self::CavityWall => "cavity-wall",
            Self::SolidWallInternal => "solid-wall-internal",
            Self::SolidWallExternal => "solid-wall-external",
            Self::Underfloor => "underfloor",
            Self::NoInsulation => "none",
            Self::DontKnow => "dont-know",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LoftFull => "Loft Insulation (Full - 270mm+)",
            Self::LoftPartial => "Loft Insulation (Partial or thin)",
            Self::CavityWall => "Cavity Wall Insulation",
            Self::SolidWallInternal => "Solid Wall Insulation (Internal)",
            Self::SolidWallExternal => "Solid Wall Insulation (External)",
            Self::Underfloor => "Underfloor Insulation",
            Self::NoInsulation => "No insulation",
            Self::DontKnow => "Don't know",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Benefit {
    UniversalCredit,
    PensionCredit,
    IncomeSupport,
    JsaIncome,
    EsaIncome,
    ChildTaxCredit,
    WorkingTaxCredit,
    HousingBenefit,
    ChildBenefit,
    #[serde(rename = "none")]
    NoneOfTheAbove,
}

impl Benefit {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::UniversalCredit,
            Self::PensionCredit,
            Self::IncomeSupport,
            Self::JsaIncome,
            Self::EsaIncome,
            Self::ChildTaxCredit,
            Self::WorkingTaxCredit,
            Self::HousingBenefit,
            Self::ChildBenefit,
            Self::NoneOfTheAbove,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::UniversalCredit => "universal-credit",
            Self::PensionCredit => "pension-credit",
            Self::IncomeSupport => "income-support",
            Self::JsaIncome => "jsa-income",
            Self::EsaIncome => "esa-income",
            Self::ChildTaxCredit => "child-tax-credit",
            Self::WorkingTaxCredit => "working-tax-credit",
            Self::HousingBenefit => "housing-benefit",
            Self::ChildBenefit => "child-benefit",
            Self::NoneOfTheAbove => "none",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UniversalCredit => "Universal Credit",
            Self::PensionCredit => "Pension Credit (Guarantee Credit)",
            Self::IncomeSupport => "Income Support",
            Self::JsaIncome => "Income-based Jobseeker's Allowance (JSA)",
            Self::EsaIncome => "Income-related Employment and Support Allowance (ESA)",
            Self::ChildTaxCredit => "Child Tax Credit (income under £18,500)",
            Self::WorkingTaxCredit => "Working Tax Credit",
            Self::HousingBenefit => "Housing Benefit",
            Self::ChildBenefit => "Child Benefit (income under £18,500)",
            Self::NoneOfTheAbove => "None of the above",
        }
    }

    /// Means-tested benefits that open the ECO4 route directly.
    pub const fn is_qualifying(self) -> bool {
        matches!(
            self,
            Self::UniversalCredit
                | Self::PensionCredit
                | Self::IncomeSupport
                | Self::JsaIncome
                | Self::EsaIncome
        )
    }

    /// Tax-credit style benefits that only count alongside a low household income.
    pub const fn is_tax_credit(self) -> bool {
        matches!(
            self,
            Self::ChildTaxCredit | Self::WorkingTaxCredit | Self::ChildBenefit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeBand {
    #[serde(rename = "under-31k")]
    Under31k,
    #[serde(rename = "31k-40k")]
    From31kTo40k,
    #[serde(rename = "over-40k")]
    Over40k,
    #[serde(rename = "prefer-not-say")]
    PreferNotToSay,
}

impl IncomeBand {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Under31k,
            Self::From31kTo40k,
            Self::Over40k,
            Self::PreferNotToSay,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::Under31k => "under-31k",
            Self::From31kTo40k => "31k-40k",
            Self::Over40k => "over-40k",
            Self::PreferNotToSay => "prefer-not-say",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under31k => "Under £31,000",
            Self::From31kTo40k => "£31,000 - £40,000",
            Self::Over40k => "Over £40,000",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// Energy Performance Certificate band as reported by the respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpcRating {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    #[serde(rename = "unknown")]
    Unknown,
}

impl EpcRating {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
            Self::G,
            Self::Unknown,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::Unknown => "unknown",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Don't know",
            other => other.value(),
        }
    }

    /// Bands D to G.
    pub const fn is_poor(self) -> bool {
        matches!(self, Self::D | Self::E | Self::F | Self::G)
    }

    /// Parses a register band letter; anything else yields `None`.
    pub fn from_band(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "G" => Some(Self::G),
            _ => None,
        }
    }
}

/// One respondent's questionnaire answers.
///
/// Single-choice questions are `None` until answered; multi-select questions are empty until
/// answered. The JSON form mirrors the client-side storage shape, so blank strings stand in
/// for unanswered single-choice fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckerAnswers {
    pub house_number: String,
    pub postcode: String,
    #[serde(serialize_with = "none_as_blank", deserialize_with = "blank_as_none")]
    pub property_type: Option<PropertyType>,
    #[serde(serialize_with = "none_as_blank", deserialize_with = "blank_as_none")]
    pub tenure: Option<Tenure>,
    #[serde(serialize_with = "none_as_blank", deserialize_with = "blank_as_none")]
    pub heating_type: Option<HeatingType>,
    pub insulation: Vec<InsulationOption>,
    pub benefits: Vec<Benefit>,
    #[serde(serialize_with = "none_as_blank", deserialize_with = "blank_as_none")]
    pub income_band: Option<IncomeBand>,
    #[serde(serialize_with = "none_as_blank", deserialize_with = "blank_as_none")]
    pub epc_rating: Option<EpcRating>,
    pub email: String,
    pub phone: String,
    pub wants_installer_contact: bool,
    pub accept_terms: bool,
    pub accept_privacy: bool,
}

impl CheckerAnswers {
    pub fn has_benefit(&self, benefit: Benefit) -> bool {
        self.benefits.contains(&benefit)
    }

    pub fn has_insulation(&self, option: InsulationOption) -> bool {
        self.insulation.contains(&option)
    }

    /// Applies every field present in the patch, leaving the rest untouched.
    pub fn merge(&mut self, patch: AnswersPatch) {
        let AnswersPatch {
            house_number,
            postcode,
            property_type,
            tenure,
            heating_type,
            insulation,
            benefits,
            income_band,
            epc_rating,
            email,
            phone,
            wants_installer_contact,
            accept_terms,
            accept_privacy,
        } = patch;

        if let Some(value) = house_number {
            self.house_number = value;
        }
        if let Some(value) = postcode {
            self.postcode = value;
        }
        if let Some(value) = property_type {
            self.property_type = value;
        }
        if let Some(value) = tenure {
            self.tenure = value;
        }
        if let Some(value) = heating_type {
            self.heating_type = value;
        }
        if let Some(value) = insulation {
            self.insulation = value;
        }
        if let Some(value) = benefits {
            self.benefits = value;
        }
        if let Some(value) = income_band {
            self.income_band = value;
        }
        if let Some(value) = epc_rating {
            self.epc_rating = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(value) = phone {
            self.phone = value;
        }
        if let Some(value) = wants_installer_contact {
            self.wants_installer_contact = value;
        }
        if let Some(value) = accept_terms {
            self.accept_terms = value;
        }
        if let Some(value) = accept_privacy {
            self.accept_privacy = value;
        }
    }
}

/// Partial update applied on top of the current answers.
///
/// Single-choice fields are tri-state: absent leaves the answer alone, a blank string or
/// `null` (`Some(None)`) resets it to unanswered, and a value (`Some(Some(_))`) replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswersPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "cleared_as_blank",
        deserialize_with = "blank_as_cleared"
    )]
    pub property_type: Option<Option<PropertyType>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "cleared_as_blank",
        deserialize_with = "blank_as_cleared"
    )]
    pub tenure: Option<Option<Tenure>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "cleared_as_blank",
        deserialize_with = "blank_as_cleared"
    )]
    pub heating_type: Option<Option<HeatingType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulation: Option<Vec<InsulationOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<Benefit>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "cleared_as_blank",
        deserialize_with = "blank_as_cleared"
    )]
    pub income_band: Option<Option<IncomeBand>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "cleared_as_blank",
        deserialize_with = "blank_as_cleared"
    )]
    pub epc_rating: Option<Option<EpcRating>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wants_installer_contact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_terms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_privacy: Option<bool>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::deserialize(value.to_string().into_deserializer()).map(Some),
    }
}

fn blank_as_cleared<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    blank_as_none(deserializer).map(Some)
}

fn cleared_as_blank<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(Some(inner)) => inner.serialize(serializer),
        _ => serializer.serialize_str(""),
    }
}

fn none_as_blank<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_single_choice_fields_read_as_unanswered() {
        let answers: CheckerAnswers = serde_json::from_value(json!({
            "postcode": "SW1A 1AA",
            "tenure": "",
            "epcRating": "unknown",
            "incomeBand": "31k-40k",
        }))
        .expect("answers parse");

        assert_eq!(answers.tenure, None);
        assert_eq!(answers.epc_rating, Some(EpcRating::Unknown));
        assert_eq!(answers.income_band, Some(IncomeBand::From31kTo40k));
        assert!(answers.benefits.is_empty());
        assert!(!answers.accept_terms);
    }

    #[test]
    fn unanswered_fields_serialize_as_blank_strings() {
        let value = serde_json::to_value(CheckerAnswers::default()).expect("serializes");
        assert_eq!(value["propertyType"], json!(""));
        assert_eq!(value["epcRating"], json!(""));
        assert_eq!(value["insulation"], json!([]));
        assert_eq!(value["wantsInstallerContact"], json!(false));
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let result = serde_json::from_value::<CheckerAnswers>(json!({
            "heatingType": "wood-burner",
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<CheckerAnswers>(json!({
            "benefits": ["universal-credit", "lottery-win"],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn catalog_values_match_wire_tags() {
        for benefit in Benefit::ordered() {
            assert_eq!(
                serde_json::to_value(benefit).expect("serializes"),
                json!(benefit.value())
            );
        }
        for band in IncomeBand::ordered() {
            assert_eq!(
                serde_json::to_value(band).expect("serializes"),
                json!(band.value())
            );
        }
        for option in InsulationOption::ordered() {
            assert_eq!(
                serde_json::to_value(option).expect("serializes"),
                json!(option.value())
            );
        }
    }

    #[test]
    fn qualifying_and_tax_credit_sets_are_disjoint() {
        for benefit in Benefit::ordered() {
            assert!(!(benefit.is_qualifying() && benefit.is_tax_credit()));
        }
        assert!(!Benefit::HousingBenefit.is_qualifying());
        assert!(!Benefit::HousingBenefit.is_tax_credit());
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut answers = CheckerAnswers {
            postcode: "M1 1AA".to_string(),
            tenure: Some(Tenure::PrivateRental),
            ..CheckerAnswers::default()
        };

        answers.merge(AnswersPatch {
            heating_type: Some(Some(HeatingType::OilBoiler)),
            benefits: Some(vec![Benefit::NoneOfTheAbove]),
            ..AnswersPatch::default()
        });

        assert_eq!(answers.postcode, "M1 1AA");
        assert_eq!(answers.tenure, Some(Tenure::PrivateRental));
        assert_eq!(answers.heating_type, Some(HeatingType::OilBoiler));
        assert_eq!(answers.benefits, vec![Benefit::NoneOfTheAbove]);
    }

    #[test]
    fn blank_patch_value_resets_single_choice_answer() {
        let mut answers = CheckerAnswers {
            tenure: Some(Tenure::OwnerOccupied),
            epc_rating: Some(EpcRating::C),
            income_band: Some(IncomeBand::Over40k),
            heating_type: Some(HeatingType::GasBoiler),
            ..CheckerAnswers::default()
        };

        let patch: AnswersPatch = serde_json::from_value(json!({
            "tenure": "",
            "epcRating": null,
            "incomeBand": "under-31k"
        }))
        .unwrap();
        assert_eq!(patch.tenure, Some(None));
        assert_eq!(patch.epc_rating, Some(None));
        assert_eq!(patch.heating_type, None);

        answers.merge(patch);
        assert_eq!(answers.tenure, None);
        assert_eq!(answers.epc_rating, None);
        assert_eq!(answers.income_band, Some(IncomeBand::Under31k));
        assert_eq!(answers.heating_type, Some(HeatingType::GasBoiler));
    }
}
