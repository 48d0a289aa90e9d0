// Test fixtures with wolnelektury.pl-style drama texts and expected outputs
// WHY: Golden-file testing requires deterministic input/output pairs for validation

/// Boilerplate closing every edition
pub const ENDING: &str = "Ta lektura, podobnie jak tysiące innych, dostępna jest na stronie wolnelektury.pl.";

/// A short edition exercising front matter, headers, directions and a long monologue
pub const SHORT_DRAMA: &str = "Aleksander Fredro

Zemsta

ISBN 978-83-288-2495-7

OSOBY:
* CZEŚNIK RAPTUSIEWICZ
* REJENT MILCZEK
* PAPKIN

Rzecz dzieje się na wsi.

AKT PIERWSZY

SCENA PIERWSZA

/Pokój w zamku Cześnika.
Cześnik siedzi przy stole./

CZEŚNIK
Mocium panie,
Z nim się zgodzić?

PAPKIN
/kłania się/
Jestem na usługi.

CZEŚNIK
Raz
Dwa
Trzy
Cztery
Pięć

SCENA DRUGA

REJENT
Niech się dzieje /cicho/ wola nieba.

PAPKIN
Ach!

-----
Ta lektura, podobnie jak tysiące innych, dostępna jest na stronie wolnelektury.pl.
";

/// Expected quote report block for SHORT_DRAMA in identified mode
pub const SHORT_DRAMA_EXPECTED: &str = "zemsta
Cześnik:Mocium panie, z nim się zgodzić?
Papkin:Jestem na usługi.

Rejent:Niechsiędziejewolanieba.
Papkin:Ach!

";
