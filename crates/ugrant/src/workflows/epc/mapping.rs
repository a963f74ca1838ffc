use super::EpcCertificate;
use crate::workflows::checker::{
    AnswersPatch, EpcRating, HeatingType, InsulationOption, PropertyType,
};

/// Insulation measures evident from the certificate's construction descriptions.
pub fn parse_insulation(certificate: &EpcCertificate) -> Vec<InsulationOption> {
    let mut insulation = Vec::new();

    let walls = certificate.walls_description.to_lowercase();
    if walls.contains("cavity") && walls.contains("filled") {
        insulation.push(InsulationOption::CavityWall);
    }

    let roof = certificate.roof_description.to_lowercase();
    if roof.contains("insulated") || roof.contains("insulation") {
        if ["300mm", "270mm", "250mm"].iter().any(|depth| roof.contains(depth)) {
            insulation.push(InsulationOption::LoftFull);
        } else if ["100mm", "150mm"].iter().any(|depth| roof.contains(depth)) {
            insulation.push(InsulationOption::LoftPartial);
        }
    }

    if certificate.floor_description.to_lowercase().contains("insulated") {
        insulation.push(InsulationOption::Underfloor);
    }

    insulation
}

/// Maps register property type and built form onto the questionnaire catalog.
///
/// Park homes and houses with an unrecognised built form have no counterpart and yield `None`.
pub fn map_property_type(property_type: &str, built_form: &str) -> Option<PropertyType> {
    let kind = property_type.to_lowercase();
    let form = built_form.to_lowercase();

    if kind.contains("bungalow") {
        return Some(PropertyType::Bungalow);
    }
    if kind.contains("maisonette") {
        return Some(PropertyType::Maisonette);
    }
    if kind.contains("flat") || kind.contains("apartment") {
        return Some(PropertyType::FlatPurposeBuilt);
    }
    if kind.contains("park home") {
        return None;
    }

    let described = format!("{kind} {form}");
    if described.contains("semi-detached") || described.contains("semi detached") {
        Some(PropertyType::SemiDetached)
    } else if described.contains("end-terrace") || described.contains("end terrace") {
        Some(PropertyType::EndTerrace)
    } else if described.contains("terrace") {
        Some(PropertyType::Terraced)
    } else if described.contains("detached") {
        Some(PropertyType::DetachedHouse)
    } else {
        None
    }
}

/// Heating inferred from main heating and fuel. Falls back to a gas boiler.
pub fn map_heating_type(main_heat: &str, main_fuel: &str) -> HeatingType {
    let heat = main_heat.to_lowercase();
    let fuel = main_fuel.to_lowercase();

    if fuel.contains("mains gas") || fuel.contains("natural gas") {
        HeatingType::GasBoiler
    } else if fuel.contains("oil") {
        HeatingType::OilBoiler
    } else if fuel.contains("lpg") || fuel.contains("bottled") {
        HeatingType::LpgBoiler
    } else if ["heat pump", "air source", "ground source"]
        .iter()
        .any(|marker| heat.contains(marker))
    {
        HeatingType::HeatPump
    } else if heat.contains("storage") && fuel.contains("electric") {
        HeatingType::ElectricStorage
    } else if fuel.contains("electric") {
        HeatingType::ElectricPanel
    } else if fuel.contains("coal") || fuel.contains("solid") {
        HeatingType::Coal
    } else {
        HeatingType::GasBoiler
    }
}

/// Answer pre-fill from a certificate. Only fields the certificate can speak to are set.
pub fn prefill_answers(certificate: &EpcCertificate) -> AnswersPatch {
    let insulation = parse_insulation(certificate);
    let has_heating = !certificate.main_heat_description.trim().is_empty()
        || !certificate.main_fuel.trim().is_empty();

    AnswersPatch {
        property_type: map_property_type(&certificate.property_type, &certificate.built_form)
            .map(Some),
        heating_type: has_heating.then(|| {
            Some(map_heating_type(
                &certificate.main_heat_description,
                &certificate.main_fuel,
            ))
        }),
        insulation: (!insulation.is_empty()).then_some(insulation),
        epc_rating: EpcRating::from_band(&certificate.current_energy_rating).map(Some),
        ..AnswersPatch::default()
    }
}
