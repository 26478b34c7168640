//! High-value top-level gaps: era, nationality, works, description, subcategory,
//! expertise areas, influence scope and legacy
//!
//! Several defaults here (pre-1900 births as "European", name particles as
//! nationality hints) are corpus assumptions rather than facts; deployments
//! override them through `[inference.defaults]`.

use crate::inference::rule::{
    absent, all, born_before, born_from, is, is_any, not, present, within,
};
use crate::inference::{Condition, FieldSpec};
use crate::Result;
use std::cmp::Reverse;

const NAME: &str = "name";
const DOMAIN: &str = "domain";
const ARCHETYPE: &str = "archetype";
const NATIONALITY: &str = "nationality";
const ERA: &str = "era";
const TRAITS: &str = "psychological_profile.primary_traits";

const UNKNOWN: &str = "Unknown";

/// Birth-year upper bounds (exclusive) per era
const ERAS: &[(i64, &str)] = &[
    (1400, "Ancient"),
    (1600, "Renaissance"),
    (1800, "Enlightenment"),
    (1900, "Industrial Age"),
    (1950, "Modern"),
    (2000, "Contemporary"),
];
const LATEST_ERA: &str = "21st Century";

/// Name particles hinting at a nationality, padded so they match whole words
const NAME_PARTICLES: &[(&str, &str)] = &[
    ("von ", "German"),
    (" de ", "French"),
    ("van ", "Dutch"),
    (" da ", "Italian"),
    (" el ", "Spanish"),
    ("al-", "Middle Eastern"),
    (" ben ", "Middle Eastern"),
    ("ibn ", "Middle Eastern"),
    ("mac", "Scottish"),
    ("o'", "Irish"),
    ("sson", "Nordic"),
];

const EUROPEAN_DOMAINS: &[&str] = &[
    "Philosophy",
    "Mathematics",
    "Physics",
    "Music",
    "Art",
    "Literature",
];

const DOMAIN_WORKS: &[(&str, &[&str])] = &[
    ("Philosophy", &["Major philosophical treatise", "Influential philosophical work"]),
    ("Mathematics", &["Mathematical theorem", "Mathematical proof", "Mathematical treatise"]),
    ("Physics", &["Physics theory", "Scientific discovery", "Physics treatise"]),
    ("Music", &["Musical composition", "Symphony", "Musical work"]),
    ("Art", &["Artwork", "Painting", "Sculpture"]),
    ("Literature", &["Novel", "Poetry collection", "Literary work"]),
    ("Science", &["Scientific discovery", "Research paper", "Scientific theory"]),
    ("Business", &["Business strategy", "Company founded", "Business innovation"]),
    ("Technology", &["Technological innovation", "Software created", "Technology developed"]),
];

const FAMOUS_WORKS: &[(&str, &[&str])] = &[
    ("einstein", &["Theory of Relativity", "E=mc²", "Nobel Prize in Physics"]),
    ("newton", &["Principia Mathematica", "Laws of Motion", "Calculus"]),
    ("shakespeare", &["Hamlet", "Romeo and Juliet", "Macbeth"]),
    ("beethoven", &["Symphony No. 9", "Moonlight Sonata", "Für Elise"]),
    ("mozart", &["The Magic Flute", "Requiem", "Symphony No. 40"]),
    ("bach", &["Brandenburg Concertos", "Mass in B Minor", "Well-Tempered Clavier"]),
];

/// (domain, archetype, subcategory)
const SUBCATEGORIES: &[(&str, &str, &str)] = &[
    ("Philosophy", "Ethicist", "Applied Ethics"),
    ("Philosophy", "Philosopher", "Moral Philosophy"),
    ("Philosophy", "Thinker", "Political Philosophy"),
    ("Business", "Entrepreneur", "Technology Startups"),
    ("Business", "CEO", "Corporate Leadership"),
    ("Business", "Investor", "Venture Capital"),
    ("Science", "Scientist", "Research"),
    ("Science", "Physicist", "Theoretical Physics"),
    ("Science", "Biologist", "Evolutionary Biology"),
    ("Technology", "Innovator", "Software Development"),
    ("Technology", "Engineer", "Systems Engineering"),
    ("Technology", "Founder", "Tech Entrepreneurship"),
    ("Art", "Artist", "Visual Arts"),
    ("Art", "Painter", "Fine Arts"),
    ("Art", "Sculptor", "Sculpture"),
    ("Music", "Composer", "Classical Music"),
    ("Music", "Musician", "Performance"),
    ("Music", "Producer", "Music Production"),
];

const DOMAIN_EXPERTISE: &[(&str, &[&str])] = &[
    ("Philosophy", &["Ethics", "Moral Philosophy", "Applied Ethics"]),
    ("Business", &["Strategic Planning", "Leadership", "Innovation"]),
    ("Science", &["Research", "Scientific Method", "Data Analysis"]),
    ("Technology", &["Software Development", "Systems Design", "Innovation"]),
    ("Art", &["Visual Arts", "Creative Expression", "Aesthetic Design"]),
    ("Music", &["Composition", "Musical Theory", "Performance"]),
];

const TRAIT_EXPERTISE: &[(&str, &str)] = &[
    ("analytical", "Analytical Thinking"),
    ("creative", "Creative Problem Solving"),
    ("leadership", "Team Leadership"),
    ("innovative", "Innovation Management"),
    ("strategic", "Strategic Planning"),
];

const DOMAIN_INFLUENCE: &[(&str, &str)] = &[
    ("Philosophy", "Academic Influence"),
    ("Business", "Industry Influence"),
    ("Science", "Scientific Community"),
    ("Technology", "Tech Industry"),
    ("Art", "Cultural Influence"),
    ("Music", "Musical Community"),
];

const FAMOUS_LEGACIES: &[(&str, &str)] = &[
    ("einstein", "Revolutionary physicist who transformed our understanding of space, time, and energy"),
    ("newton", "Foundational physicist and mathematician who established classical mechanics"),
    ("shakespeare", "Greatest playwright in English literature, whose works continue to influence culture"),
    ("beethoven", "Composer who bridged classical and romantic eras, creating timeless musical masterpieces"),
    ("mozart", "Prolific composer whose musical genius continues to inspire musicians worldwide"),
    ("bach", "Baroque composer whose musical innovations laid the foundation for Western classical music"),
];

const DOMAIN_LEGACIES: &[(&str, &str)] = &[
    ("Philosophy", "Influential thinker whose ideas continue to shape philosophical discourse"),
    ("Business", "Visionary leader who transformed their industry and influenced business practices"),
    ("Science", "Pioneering scientist whose discoveries advanced human knowledge"),
    ("Technology", "Innovator who created technologies that changed how we live and work"),
    ("Art", "Artist whose works continue to inspire and influence visual culture"),
    ("Music", "Musician whose compositions have left an enduring mark on musical history"),
];

pub fn specs() -> Result<Vec<FieldSpec>> {
    Ok(vec![
        era()?,
        nationality()?,
        notable_works()?,
        description()?,
        subcategory()?,
        expertise_areas()?,
        influence_scope()?,
        legacy()?,
    ])
}

fn era() -> Result<FieldSpec> {
    let mut vocabulary: Vec<&str> = ERAS.iter().map(|(_, era)| *era).collect();
    vocabulary.extend([LATEST_ERA, UNKNOWN]);

    let mut spec = FieldSpec::categorical(ERA).vocabulary(&vocabulary);
    for (bound, era) in ERAS {
        spec = spec.when(born_before(*bound), era);
    }
    let last_bound = ERAS.last().map_or(2000, |(bound, _)| *bound);
    spec.when(born_from(last_bound), LATEST_ERA)
        .default(UNKNOWN)
        .build()
}

fn nationality() -> Result<FieldSpec> {
    let mut vocabulary: Vec<&str> = Vec::new();
    for (_, nationality) in NAME_PARTICLES {
        if !vocabulary.contains(nationality) {
            vocabulary.push(*nationality);
        }
    }
    vocabulary.extend(["European", "American", UNKNOWN]);

    let mut spec = FieldSpec::categorical(NATIONALITY).vocabulary(&vocabulary);
    for (particle, nationality) in NAME_PARTICLES {
        spec = spec.when(within(&[NAME], &[*particle]), nationality);
    }
    spec.when(is_any(DOMAIN, EUROPEAN_DOMAINS), "European")
        .when(born_before(1900), "European")
        .when(born_from(1901), "American")
        .default(UNKNOWN)
        .build()
}

fn notable_works() -> Result<FieldSpec> {
    let mut spec = FieldSpec::multi_value("notable_works", 3);
    for (domain, works) in DOMAIN_WORKS {
        spec = spec.only(is(DOMAIN, domain), works);
    }
    for (name, works) in FAMOUS_WORKS {
        spec = spec.only(within(&[NAME], &[*name]), works);
    }
    spec.defaults(&["Notable work", "Major contribution"]).build()
}

/// Sentence from whichever of nationality, era, domain and archetype are known
fn description() -> Result<FieldSpec> {
    let known = |field: &str| all(vec![present(field), not(is(field, UNKNOWN))]);
    let parts: [(Condition, &str); 4] = [
        (known(NATIONALITY), "{nationality}"),
        (known(ERA), "{era|lower}"),
        (present(DOMAIN), "{domain|lower} professional"),
        (present(ARCHETYPE), "known for {archetype|lower}"),
    ];

    // largest combinations first, so the first match uses every known part
    let mut combinations: Vec<u32> = (1..1 << parts.len()).collect();
    combinations.sort_by_key(|mask| Reverse(mask.count_ones()));

    let mut spec = FieldSpec::text("description");
    for mask in combinations {
        let chosen: Vec<&(Condition, &str)> = parts
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1 << index) != 0)
            .map(|(_, part)| part)
            .collect();
        let condition = all(chosen.iter().map(|(when, _)| when.clone()).collect());
        let fragments: Vec<&str> = chosen.iter().map(|(_, fragment)| *fragment).collect();
        spec = spec.render(condition, &format!("{}.", fragments.join(" ")));
    }
    spec.render(present(NAME), "{name} - notable figure in their field.")
        .default("Notable figure in their field.")
        .build()
}

fn subcategory() -> Result<FieldSpec> {
    let mut spec = FieldSpec::text("subcategory");
    for (domain, archetype, subcategory) in SUBCATEGORIES {
        spec = spec.render(all(vec![is(DOMAIN, domain), is(ARCHETYPE, archetype)]), subcategory);
    }
    spec.render(present(DOMAIN), "{domain} Professional")
        .default("General")
        .build()
}

fn expertise_areas() -> Result<FieldSpec> {
    let known_domains: Vec<&str> = DOMAIN_EXPERTISE.iter().map(|(domain, _)| *domain).collect();

    let mut spec = FieldSpec::multi_value("expertise_areas", 5);
    for (domain, areas) in DOMAIN_EXPERTISE {
        spec = spec.add(is(DOMAIN, domain), areas);
    }
    spec = spec
        .render(
            all(vec![present(DOMAIN), not(is_any(DOMAIN, &known_domains))]),
            "{domain}",
        )
        .add(absent(DOMAIN), &["Professional Expertise"]);
    for (trait_word, area) in TRAIT_EXPERTISE {
        spec = spec.add(within(&[TRAITS], &[*trait_word]), &[*area]);
    }
    spec.default("Professional Expertise").build()
}

/// Domain community first, then the birth-year era, then the generic default
fn influence_scope() -> Result<FieldSpec> {
    let mut vocabulary: Vec<&str> = DOMAIN_INFLUENCE.iter().map(|(_, scope)| *scope).collect();
    vocabulary.extend([
        "Historical Influence",
        "Modern Influence",
        "Contemporary Influence",
        "Professional Influence",
    ]);

    let mut spec = FieldSpec::categorical("influence_scope").vocabulary(&vocabulary);
    for (domain, scope) in DOMAIN_INFLUENCE {
        spec = spec.when(is(DOMAIN, domain), scope);
    }
    spec.when(born_before(1800), "Historical Influence")
        .when(born_before(1950), "Modern Influence")
        .when(born_from(1950), "Contemporary Influence")
        .default("Professional Influence")
        .build()
}

fn legacy() -> Result<FieldSpec> {
    let mut spec = FieldSpec::text("legacy");
    for (name, legacy) in FAMOUS_LEGACIES {
        spec = spec.render(within(&[NAME], &[*name]), legacy);
    }
    for (domain, legacy) in DOMAIN_LEGACIES {
        spec = spec.render(is(DOMAIN, domain), legacy);
    }
    spec.default("Notable figure whose contributions continue to be recognized")
        .build()
}
