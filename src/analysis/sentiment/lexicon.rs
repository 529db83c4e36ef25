//! Valence lexicon and modifier word lists.
//!
//! Valences follow the VADER scale (roughly -4 to +4) for the words that show
//! up in product reviews.

pub(super) const LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("awesome", 3.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("bland", -1.1),
    ("bothered", -1.1),
    ("careless", -1.5),
    ("cheap", -0.2),
    ("clean", 1.7),
    ("comfortable", 1.8),
    ("complain", -1.5),
    ("complaint", -1.2),
    ("convenient", 1.5),
    ("cool", 1.3),
    ("defective", -1.9),
    ("delight", 2.9),
    ("delighted", 2.4),
    ("dirty", -1.9),
    ("disappoint", -2.2),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("disaster", -3.1),
    ("disgusting", -2.4),
    ("dislike", -1.6),
    ("easy", 1.9),
    ("effective", 2.1),
    ("enjoy", 2.2),
    ("excellent", 2.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("flimsy", -1.3),
    ("fragile", -0.9),
    ("fresh", 1.3),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("garbage", -1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("hate", -2.7),
    ("helpful", 1.8),
    ("horrible", -2.5),
    ("ideal", 2.2),
    ("impressed", 2.1),
    ("junk", -1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("loves", 2.7),
    ("mess", -1.5),
    ("messy", -1.5),
    ("nasty", -2.6),
    ("nice", 1.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("pathetic", -2.1),
    ("perfect", 2.7),
    ("perfectly", 3.2),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("poor", -2.1),
    ("poorly", -1.9),
    ("problem", -1.7),
    ("problems", -1.7),
    ("recommend", 1.5),
    ("recommended", 0.8),
    ("refund", -0.2),
    ("reliable", 1.6),
    ("ruined", -2.4),
    ("sad", -2.1),
    ("safe", 1.9),
    ("satisfied", 1.8),
    ("secure", 1.4),
    ("smells", -0.4),
    ("solid", 1.3),
    ("sorry", -0.3),
    ("sturdy", 1.2),
    ("superb", 3.1),
    ("terrible", -2.1),
    ("thanks", 1.9),
    ("trash", -1.5),
    ("ugly", -2.3),
    ("unacceptable", -2.0),
    ("unfortunately", -1.4),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("weak", -1.9),
    ("well", 1.1),
    ("wonderful", 2.7),
    ("worse", -2.1),
    ("worst", -3.1),
    ("worth", 0.9),
    ("worthless", -1.9),
    ("wow", 2.8),
    ("wrong", -2.1),
];

pub(super) const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "nobody", "none",
    "nope", "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without",
    "wont", "wouldnt",
];

pub(super) const BOOSTERS_UP: &[&str] = &[
    "absolutely", "completely", "deeply", "especially", "extremely", "highly", "hugely",
    "incredibly", "really", "so", "super", "thoroughly", "totally", "truly", "utterly", "very",
];

pub(super) const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sorta",
];

pub(super) fn valence(word: &str) -> Option<f64> {
    LEXICON
        .binary_search_by(|(w, _)| w.cmp(&word))
        .ok()
        .map(|i| LEXICON[i].1)
}
