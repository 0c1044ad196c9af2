use serde::{Deserialize, Serialize};

/// Keyword and phrase lists consumed by the detectors and the flagger.
///
/// Matching is case-insensitive substring matching, so entries are stems
/// as often as whole words ("masturb", "éjacul").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Lexicon {
    /// Suicidal ideation phrasing, matched against user turns.
    pub self_harm: Vec<String>,
    /// Sexual harassment directed at the listener, matched against user turns.
    pub harassment: Vec<String>,
    /// Insistence formulas, counted across the whole transcript.
    pub insistence: Vec<String>,
    /// Guilt-tripping phrasing, matched per line.
    pub guilt: Vec<String>,
    /// Veiled threats, matched per line.
    pub threat: Vec<String>,
    /// Presence anywhere discounts the score (survivor recounting past events).
    pub trauma_narrative: Vec<String>,
    /// Presence anywhere discounts the score (caller discussing their own condition).
    pub mental_health: Vec<String>,
    /// Broad multilingual list for the preliminary flagger.
    pub abuse: Vec<String>,
    /// Excluded from TF-IDF vocabularies.
    pub stop_words: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            self_harm: strings(SELF_HARM),
            harassment: strings(HARASSMENT),
            insistence: strings(INSISTENCE),
            guilt: strings(GUILT),
            threat: strings(THREAT),
            trauma_narrative: strings(TRAUMA_NARRATIVE),
            mental_health: strings(MENTAL_HEALTH),
            abuse: strings(ABUSE),
            stop_words: strings(STOP_WORDS),
        }
    }
}

pub(crate) fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

const SELF_HARM: &[&str] = &[
    "suicide",
    "me tuer",
    "mourir",
    "en finir",
    "plus envie de vivre",
    "mettre fin à mes jours",
    "me suicider",
    "disparaître",
    "plus la force",
];

const HARASSMENT: &[&str] = &[
    "tu aimes le sexe",
    "t'aimes sucer",
    "tu veux baiser",
    "tu es excité",
    "tu bandes",
    "tu mouilles",
    "tu te masturbes",
];

const INSISTENCE: &[&str] = &[
    "s'il te plait",
    "stp",
    "svp",
    "je t'en prie",
    "je t'en supplie",
    "allez",
    "aller",
    "réponds",
    "reponds",
    "répond",
    "repond",
];

const GUILT: &[&str] = &[
    "tu ne veux pas m'aider",
    "tu refuses de m'aider",
    "tu ne veux pas me répondre",
    "tu m'ignores",
    "tu ne comprends pas",
    "tu ne fais pas d'effort",
    "c'est de ta faute",
    "à cause de toi",
    "par ta faute",
];

const THREAT: &[&str] = &[
    "tu vas voir",
    "tu regretteras",
    "tu le regretteras",
    "tu vas le regretter",
    "je vais me plaindre",
    "je vais le dire",
    "je sais où",
    "je peux te trouver",
];

const TRAUMA_NARRATIVE: &[&str] = &[
    "quand j'étais",
    "dans mon enfance",
    "j'ai été victime",
    "j'ai subi",
    "on m'a fait",
    "je me souviens",
    "flashback",
    "souvenir",
    "traumatisme",
    "j'ai été agressé",
    "harcelé",
];

const MENTAL_HEALTH: &[&str] = &[
    "voix dans ma tête",
    "j'entends des voix",
    "hallucination",
    "trouble dissociatif",
    "TDI",
    "schizophrénie",
    "dépression",
    "anxiété",
    "psychiatrie",
    "hospitalisation",
    "thérapie",
];

const ABUSE: &[&str] = &[
    // explicit sexual content
    "sexe", "bite", "queue", "pénis", "penis", "zboub", "vagin", "chatte", "cunni",
    "masturb", "branler", "branlette", "fap", "fellation", "pipe", "sucer",
    "bander", "gode", "godemichet", "baiser", "ken", "niquer", "niqué", "niquee",
    "sodom", "sodomie", "anal", "dp", "orgie", "orgasm", "orgasme", "jouir",
    "gicler", "giclée", "éjacul", "ejacul", "cum", "creampie", "facial", "porno",
    "porn", "xxx", "cul", "nichon", "nichons", "sein", "seins", "boobs", "boobies",
    "téton", "tétons", "nipple",
    // inappropriate requests
    "photo", "nue", "nu", "déshabille", "deshabille", "montre-moi", "montre moi",
    "caméra", "camera", "vidéo", "video", "snapchat", "instagram", "facebook",
    "onlyfans", "strip", "striptease", "strip tease",
    // harassment, threats, self-harm
    "connard", "salope", "pute", "enculé", "encule", "pd", "tapette", "nègre",
    "negre", "bougnoule", "suicide", "tuer", "mourir", "crever", "adresse",
    "menace", "frapper", "battre", "harcèle", "harcele", "stalker",
    // location disclosure
    "je te surveille", "je sais où tu es", "je sais ou tu es", "je t'observe",
    "je vais te retrouver", "je connais ton adresse", "donne-moi ton adresse",
    "donne moi ton adresse", "adresse ip", "ip address", "gps", "géolocalisation",
    "share location", "send location", "where you live", "gps coordinates",
    "dox", "doxx", "doxxing", "docx",
];

const STOP_WORDS: &[&str] = &[
    "a", "ai", "aie", "as", "au", "aux", "avec", "avais", "avait", "c", "ce", "ces",
    "cet", "cette", "ça", "d", "dans", "de", "des", "du", "elle", "elles", "en", "es",
    "est", "et", "été", "eu", "il", "ils", "j", "je", "l", "la", "le", "les", "leur",
    "lui", "m", "ma", "mais", "me", "même", "mes", "moi", "mon", "n", "ne", "nos",
    "notre", "nous", "on", "ont", "ou", "où", "par", "pas", "pour", "qu", "que",
    "qui", "s", "sa", "se", "ses", "si", "son", "sont", "sur", "t", "ta", "te",
    "tes", "toi", "ton", "tu", "un", "une", "vos", "votre", "vous", "y", "suis",
    "était", "fait", "plus", "très", "bien", "aussi", "alors", "comme", "tout",
    "rien", "oui", "non",
];
