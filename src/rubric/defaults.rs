//! Built-in rubrics for the fair's six categories.

use super::{Criterion, Rubric};

/// Shared weight vector of the 9-criterion categories, criterion 1 first.
pub const NINE_CRITERION_WEIGHTS: [f64; 9] = [0.9, 0.8, 0.7, 0.6, 0.6, 0.4, 0.4, 0.3, 0.3];

/// Categories scored on six criteria instead of nine.
pub const SIX_CRITERION_CATEGORIES: [&str; 2] = ["IFTECH", "Robótica"];

// Allowed marks per criterion position for the 9-criterion rubrics.
const MARKS_1: &[f64] = &[0.0, 0.4, 0.9, 1.4, 1.8];
const MARKS_2: &[f64] = &[0.0, 0.4, 0.8, 1.2, 1.6];
const MARKS_3: &[f64] = &[0.0, 0.4, 0.7, 1.0, 1.4];
const MARKS_4: &[f64] = &[0.0, 0.3, 0.6, 0.9, 1.2];
const MARKS_6: &[f64] = &[0.0, 0.2, 0.4, 0.6, 0.8];
const MARKS_8: &[f64] = &[0.0, 0.2, 0.3, 0.4, 0.6];

// Prototype rubrics (IFTECH, Robótica)
const PROTO_SMALL: &[f64] = &[0.0, 0.25, 0.5, 1.0, 1.5];
const PROTO_LARGE: &[f64] = &[0.0, 0.5, 1.0, 1.5, 2.0];
const PROTO_UNIT: &[f64] = &[0.0, 0.25, 0.5, 0.75, 1.0];

fn nine_criterion(category: &str, labels: [&str; 9]) -> Rubric {
    let marks = [
        MARKS_1, MARKS_2, MARKS_3, MARKS_4, MARKS_4, MARKS_6, MARKS_6, MARKS_8, MARKS_8,
    ];
    let criteria = labels
        .iter()
        .zip(marks)
        .map(|(label, values)| Criterion::new(label, values))
        .collect();
    Rubric::new(category, criteria, NINE_CRITERION_WEIGHTS.to_vec())
}

fn six_criterion(category: &str, labels: [&str; 6]) -> Rubric {
    let marks = [
        PROTO_SMALL,
        PROTO_LARGE,
        PROTO_UNIT,
        PROTO_LARGE,
        PROTO_SMALL,
        PROTO_LARGE,
    ];
    let criteria = labels
        .iter()
        .zip(marks)
        .map(|(label, values)| Criterion::new(label, values))
        .collect();
    // Scored with the first six positions of the shared vector.
    Rubric::new(category, criteria, NINE_CRITERION_WEIGHTS[..6].to_vec())
}

pub(super) fn default_rubrics() -> Vec<Rubric> {
    vec![
        nine_criterion(
            "Ensino",
            [
                "Domínio do estudante sobre o trabalho.",
                "Clareza e objetividade da apresentação.",
                "Definição da proposta do projeto.",
                "Elaboração do banner (aspectos visuais, diagramação, coesão).",
                "Contribuição para melhoria do ensino e aprendizagem.",
                "Metodologia inovadora e ressignificativa.",
                "Contribuição para a sociedade e formação integral.",
                "Articulação entre ensino, pesquisa e extensão.",
                "Relevância social do projeto.",
            ],
        ),
        nine_criterion(
            "Pesquisa/Inovação",
            [
                "Domínio do estudante sobre o trabalho.",
                "Clareza da apresentação.",
                "Definição da proposta do projeto.",
                "Elaboração do banner (aspectos visuais, diagramação).",
                "Conhecimento em relação à metodologia proposta.",
                "Domínio teórico baseado em literatura científica.",
                "Relação entre resultados e objetivos.",
                "Relevância para a sociedade.",
                "Interdisciplinaridade do projeto.",
            ],
        ),
        nine_criterion(
            "Extensão",
            [
                "Domínio do estudante sobre o trabalho.",
                "Clareza da apresentação.",
                "Definição da proposta do projeto.",
                "Elaboração do banner (aspectos visuais, diagramação).",
                "Participação da comunidade externa.",
                "Potencial de impacto social/político/cultural.",
                "Resultados obtidos e demandas atendidas.",
                "Relação entre resultados e objetivos.",
                "Interdisciplinaridade do projeto.",
            ],
        ),
        nine_criterion(
            "Comunicação Oral",
            [
                "Domínio do tema considerando fundamentação teórica.",
                "Clareza e objetividade da apresentação.",
                "Definição da proposta do projeto.",
                "Elaboração dos slides (visuais, texto, coesão).",
                "Contribuição para experiência acadêmica e profissional.",
                "Domínio e desenvoltura na apresentação.",
                "Relação entre resultados e objetivos.",
                "Relevância e contribuição social.",
                "Domínio no uso de recursos audiovisuais.",
            ],
        ),
        six_criterion(
            "IFTECH",
            [
                "Objetivos e métodos bem definidos?",
                "Protótipo visa solucionar problemas locais?",
                "Sustentabilidade e responsabilidade social?",
                "Inovação e criatividade do protótipo?",
                "Desempenho na explicação do protótipo.",
                "Viabilidade técnica e aplicabilidade.",
            ],
        ),
        six_criterion(
            "Robótica",
            [
                "Objetivos e métodos bem definidos?",
                "Funcionalidade do robô.",
                "Sustentabilidade e responsabilidade social?",
                "Inovação e criatividade.",
                "Desempenho na demonstração prática.",
                "Viabilidade técnica.",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_criterion_categories_match_table() {
        for rubric in default_rubrics() {
            let expected = if SIX_CRITERION_CATEGORIES.contains(&rubric.category.as_str()) {
                6
            } else {
                9
            };
            assert_eq!(rubric.criterion_count(), expected, "{}", rubric.category);
            assert_eq!(rubric.weights.len(), expected, "{}", rubric.category);
        }
    }
}
