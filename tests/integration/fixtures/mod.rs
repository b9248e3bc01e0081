// Rule files and corpora with known extraction results
// WHY: golden testing needs deterministic input/output pairs

/// Extraction rules: possessives and coordination are matched whole so the
/// rejection rules have something to split
pub const EXTRACTION_RULES: &str = r"# Base noun phrase rules, highest priority first

# phrases
POSSESSIVE;;(?:;@DET@; )?(?:;@MOD@; )*(?:;@NOUN@; )+'s/POS (?:;@MOD@; )*;@NOUN@;
COORDINATION;;(?:;@DET@; )?(?:;@MOD@; )*;@NOUN@; and/CC (?:;@MOD@; )*;@NOUN@;
NP;;(?:;@DET@; )?(?:;@MOD@; )*(?:;@NOUN@; )*;@NOUN@;
PRONOUN;;\w+/PRP

# building blocks, also matched on their own
NOUN;;\S+/(?:NNPS|NNP|NNS|NN)
MOD;;\S+/(?:JJR|JJS|JJ|CD|VBN)
DET;;\w+/DT
";

pub const REJECTION_RULES: &str = r"# possessive: the possessed phrase keeps the marker
∞'s∞;keepright;
;@phrase@;

# coordination: each conjunct stands alone
∞ and/CC ∞;none;
;@phrasepartone@; and/CC ;@phraseparttwo@;
";

/// Gold-tagged columnar corpus, three sentences
pub const TAGGED_CORPUS: &str = "The\tDT\nold\tJJ\nman\tNN\n's\tPOS\ndog\tNN\nbarked\tVBD\nat\tIN\nthe\tDT\npostman\tNN\n.\t.\n\
\n\
He\tPRP\nfed\tVBD\nthe\tDT\ncats\tNNS\nand\tCC\ndogs\tNNS\n.\t.\n\
\n\
The\tDT\nbank\tNN\nnear\tIN\nthe\tDT\nbank\tNN\nclosed\tVBD\n.\t.\n";

/// Final phrases for TAGGED_CORPUS: (surface, start, end, head)
pub const TAGGED_CORPUS_PHRASES: &[(&str, i64, i64, &str)] = &[
    ("The old man", 0, 10, ""),
    ("'s dog", 12, 17, ""),
    ("the postman", 29, 39, "NN"),
    ("He", 43, 44, "PRP"),
    ("the cats", 50, 57, ""),
    ("dogs", 63, 66, ""),
    ("The bank", 70, 77, "NN"),
    ("the bank", 84, 91, "NN"),
];

/// BIO rendering of TAGGED_CORPUS; stops after the last phrase
pub const TAGGED_CORPUS_BIO: &str = "The\tDT\tB
old\tJJ\tI
man\tNN\tI
's\tPOS\tB
dog\tNN\tI
barked\tVBD\tO
at\tIN\tO
the\tDT\tB
postman\tNN\tI
.\t.\tO

He\tPRP\tB
fed\tVBD\tO
the\tDT\tB
cats\tNNS\tI
and\tCC\tO
dogs\tNNS\tB
.\t.\tO

The\tDT\tB
bank\tNN\tI
near\tIN\tO
the\tDT\tB
bank\tNN\tI
";

/// Single noun rule and a two-token sentence
pub const SINGLE_NOUN_RULES: &str = "NP;;\\w+/NN\n";
pub const SINGLE_NOUN_CORPUS: &str = "cat NN\nran VB\n";

/// Possessive split: the right part (`'s tail`) must end the sentence
pub const POSSESSIVE_RULES: &str = "NP;;(?:\\w+/DT )?(?:\\S+/(?:NN|POS) )*\\w+/NN\n";
pub const POSSESSIVE_REJECTION: &str = "∞'s∞;keepright;\n;@phraseparttwo@;$\n";
pub const POSSESSIVE_CORPUS: &str = "the DT\ndog NN\n's POS\ntail NN\n";

/// Placeholder naming a rule that does not exist
pub const MISSING_REFERENCE_RULES: &str = "# dangling reference\nNP;;;@ghost@;\n";

/// Free text plus the lexicon that tags it
pub const FREE_TEXT: &str = "The cat sat on the mat. Dr. Smith's dog didn't bark!";
pub const LEXICON: &str = "# word\ttag\nthe\tDT\ncat\tNN\nsat\tVBD\non\tIN\nmat\tNN\nDr.\tNNP\nSmith\tNNP\n's\tPOS\ndog\tNN\ndid\tVBD\nn't\tRB\nbark\tVB\n";
