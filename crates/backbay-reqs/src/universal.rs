//! The closed set of facts a rule can examine.
//!
//! A [`Universal`] pairs a kind tag with its payload. Entity payloads are ids
//! into the [`Ruleset`]; the universal never owns the entity.

use backbay_ruleset::{
    named_enum, AchievementId, ActionId, BaseFlagId, BuildingGenus, BuildingId, ExtraFlagId,
    ExtraId, GoodId, GovernmentId, NationGroupId, NationId, RoadFlagId, Ruleset, RuntimeId,
    ServerSettingId, SpecialistId, TechFlagId, TechId, TerrainAlteration, TerrainClass,
    TerrainFlagId, TerrainId, TopologyFlag, UnitClassFlagId, UnitClassId, UnitTypeFlagId,
    UnitTypeId,
};

named_enum! {
    /// Kind tag of a [`Universal`]. The index is the stable numeric kind.
    pub enum UniversalKind {
        None => "None",
        Advance => "Tech",
        TechFlag => "TechFlag",
        Government => "Gov",
        Achievement => "Achievement",
        Improvement => "Building",
        ImprGenus => "BuildingGenus",
        Extra => "Extra",
        Good => "Good",
        Terrain => "Terrain",
        TerrainClass => "TerrainClass",
        TerrainFlag => "TerrainFlag",
        Nation => "Nation",
        NationGroup => "NationGroup",
        Nationality => "Nationality",
        DiplRel => "DiplRel",
        UnitType => "UnitType",
        UnitTypeFlag => "UnitFlag",
        UnitClass => "UnitClass",
        UnitClassFlag => "UnitClassFlag",
        MinVeteran => "MinVeteran",
        UnitState => "UnitState",
        Activity => "Activity",
        MinMoveFrags => "MinMoveFrags",
        MinHitPoints => "MinHitPoints",
        Age => "Age",
        MinTechs => "MinTechs",
        Action => "Action",
        OutputType => "OutputType",
        Specialist => "Specialist",
        MinSize => "MinSize",
        MinCulture => "MinCulture",
        MinForeignPct => "MinForeignPct",
        AiLevel => "AI",
        MaxUnitsOnTile => "MaxUnitsOnTile",
        BaseFlag => "BaseFlag",
        RoadFlag => "RoadFlag",
        ExtraFlag => "ExtraFlag",
        MinYear => "MinYear",
        MinCalFrag => "MinCalFrag",
        TopologyFlag => "Topology",
        ServerSetting => "ServerSetting",
        TerrainAlter => "TerrainAlter",
        CityTile => "CityTile",
        CityStatus => "CityStatus",
        VisionLayer => "VisionLayer",
        NationalIntel => "NationalIntelligence",
        Invalid => "Invalid",
    }
}

named_enum! {
    /// Diplomatic states plus the other player-to-player relations.
    pub enum DiplRel {
        Armistice => "Armistice",
        War => "War",
        Ceasefire => "Cease-fire",
        Peace => "Peace",
        Alliance => "Alliance",
        NoContact => "Never met",
        Team => "Team",
        GivesSharedVision => "Gives shared vision",
        ReceivesSharedVision => "Receives shared vision",
        HostsEmbassy => "Hosts embassy",
        HasEmbassy => "Has embassy",
        HasCasusBelli => "Has Casus Belli",
        ProvidedCasusBelli => "Provided Casus Belli",
        Foreign => "Foreign",
    }
}

impl DiplRel {
    /// True for the mutually exclusive diplomatic states; only one is in
    /// force between two players at a time.
    pub fn is_diplstate(self) -> bool {
        matches!(
            self,
            DiplRel::Armistice
                | DiplRel::War
                | DiplRel::Ceasefire
                | DiplRel::Peace
                | DiplRel::Alliance
                | DiplRel::NoContact
                | DiplRel::Team
        )
    }
}

named_enum! {
    pub enum UnitStateProp {
        Transported => "Transported",
        Transporting => "Transporting",
        OnNativeTile => "OnNativeTile",
        OnLivableTile => "OnLivableTile",
        HasHomeCity => "HasHomeCity",
        OnDomesticTile => "OnDomesticTile",
    }
}

named_enum! {
    pub enum Activity {
        Idle => "Idle",
        Fortifying => "Fortifying",
        Fortified => "Fortified",
        Sentry => "Sentry",
        Pillage => "Pillage",
        Explore => "Explore",
        Irrigate => "Irrigate",
        Mine => "Mine",
        Transform => "Transform",
        BuildRoad => "Road",
        BuildBase => "Base",
        CleanPollution => "Pollution",
        Convert => "Convert",
    }
}

named_enum! {
    pub enum OutputType {
        Food => "Food",
        Shield => "Shield",
        Trade => "Trade",
        Gold => "Gold",
        Luxury => "Luxury",
        Science => "Science",
    }
}

named_enum! {
    pub enum AiLevel {
        Away => "Away",
        Handicapped => "Handicapped",
        Novice => "Novice",
        Easy => "Easy",
        Normal => "Normal",
        Hard => "Hard",
        Cheating => "Cheating",
    }
}

named_enum! {
    pub enum CityTile {
        Center => "Center",
        Claimed => "Claimed",
        ExtrasOwned => "Extras Owned",
        Worked => "Worked",
        SameContinent => "Same Continent",
    }
}

named_enum! {
    pub enum CityStatus {
        OwnedByOriginal => "OwnedByOriginal",
        Starved => "Starved",
        Disorder => "Disorder",
        Celebration => "Celebration",
    }
}

named_enum! {
    pub enum VisionLayer {
        Main => "Main",
        Stealth => "Stealth",
        Subsurface => "Subsurface",
    }
}

named_enum! {
    pub enum NationalIntel {
        Gold => "Gold",
        Government => "Government",
        Achievements => "Achievements",
        Diplstates => "Diplstates",
        Embassies => "Embassies",
        History => "History",
        Culture => "Culture",
        Score => "Score",
        Wonders => "Wonders",
        Mood => "Mood",
    }
}

/// A tagged fact: "this technology", "at least 3 move fragments", ...
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Universal {
    None,
    Advance(TechId),
    TechFlag(TechFlagId),
    Government(GovernmentId),
    Achievement(AchievementId),
    Improvement(BuildingId),
    ImprGenus(BuildingGenus),
    Extra(ExtraId),
    Good(GoodId),
    Terrain(TerrainId),
    TerrainClass(TerrainClass),
    TerrainFlag(TerrainFlagId),
    Nation(NationId),
    NationGroup(NationGroupId),
    Nationality(NationId),
    DiplRel(DiplRel),
    UnitType(UnitTypeId),
    UnitTypeFlag(UnitTypeFlagId),
    UnitClass(UnitClassId),
    UnitClassFlag(UnitClassFlagId),
    MinVeteran(u8),
    UnitState(UnitStateProp),
    Activity(Activity),
    MinMoveFrags(i32),
    MinHitPoints(i32),
    Age(i32),
    MinTechs(i32),
    Action(ActionId),
    OutputType(OutputType),
    Specialist(SpecialistId),
    MinSize(i32),
    MinCulture(i32),
    MinForeignPct(i32),
    AiLevel(AiLevel),
    MaxUnitsOnTile(i32),
    BaseFlag(BaseFlagId),
    RoadFlag(RoadFlagId),
    ExtraFlag(ExtraFlagId),
    MinYear(i32),
    MinCalFrag(i32),
    TopologyFlag(TopologyFlag),
    ServerSetting(ServerSettingId),
    TerrainAlter(TerrainAlteration),
    CityTile(CityTile),
    CityStatus(CityStatus),
    VisionLayer(VisionLayer),
    NationalIntel(NationalIntel),
    /// Parse or lookup failure. Never matches anything.
    Invalid,
}

const UNKNOWN: &str = "(unknown)";

fn topology_index(flag: TopologyFlag) -> usize {
    TopologyFlag::ALL
        .iter()
        .position(|f| *f == flag)
        .unwrap_or_default()
}

fn id_in<Tag>(len: usize, value: i32) -> Option<RuntimeId<Tag>> {
    (value >= 0 && (value as usize) < len).then(|| RuntimeId::new(value as u16))
}

fn flag_in(len: usize, value: i32) -> Option<u16> {
    (value >= 0 && (value as usize) < len).then_some(value as u16)
}

fn enum_in<T>(from_index: fn(usize) -> Option<T>, value: i32) -> Option<T> {
    usize::try_from(value).ok().and_then(from_index)
}

impl Universal {
    pub fn kind(&self) -> UniversalKind {
        use UniversalKind as K;
        match self {
            Universal::None => K::None,
            Universal::Advance(_) => K::Advance,
            Universal::TechFlag(_) => K::TechFlag,
            Universal::Government(_) => K::Government,
            Universal::Achievement(_) => K::Achievement,
            Universal::Improvement(_) => K::Improvement,
            Universal::ImprGenus(_) => K::ImprGenus,
            Universal::Extra(_) => K::Extra,
            Universal::Good(_) => K::Good,
            Universal::Terrain(_) => K::Terrain,
            Universal::TerrainClass(_) => K::TerrainClass,
            Universal::TerrainFlag(_) => K::TerrainFlag,
            Universal::Nation(_) => K::Nation,
            Universal::NationGroup(_) => K::NationGroup,
            Universal::Nationality(_) => K::Nationality,
            Universal::DiplRel(_) => K::DiplRel,
            Universal::UnitType(_) => K::UnitType,
            Universal::UnitTypeFlag(_) => K::UnitTypeFlag,
            Universal::UnitClass(_) => K::UnitClass,
            Universal::UnitClassFlag(_) => K::UnitClassFlag,
            Universal::MinVeteran(_) => K::MinVeteran,
            Universal::UnitState(_) => K::UnitState,
            Universal::Activity(_) => K::Activity,
            Universal::MinMoveFrags(_) => K::MinMoveFrags,
            Universal::MinHitPoints(_) => K::MinHitPoints,
            Universal::Age(_) => K::Age,
            Universal::MinTechs(_) => K::MinTechs,
            Universal::Action(_) => K::Action,
            Universal::OutputType(_) => K::OutputType,
            Universal::Specialist(_) => K::Specialist,
            Universal::MinSize(_) => K::MinSize,
            Universal::MinCulture(_) => K::MinCulture,
            Universal::MinForeignPct(_) => K::MinForeignPct,
            Universal::AiLevel(_) => K::AiLevel,
            Universal::MaxUnitsOnTile(_) => K::MaxUnitsOnTile,
            Universal::BaseFlag(_) => K::BaseFlag,
            Universal::RoadFlag(_) => K::RoadFlag,
            Universal::ExtraFlag(_) => K::ExtraFlag,
            Universal::MinYear(_) => K::MinYear,
            Universal::MinCalFrag(_) => K::MinCalFrag,
            Universal::TopologyFlag(_) => K::TopologyFlag,
            Universal::ServerSetting(_) => K::ServerSetting,
            Universal::TerrainAlter(_) => K::TerrainAlter,
            Universal::CityTile(_) => K::CityTile,
            Universal::CityStatus(_) => K::CityStatus,
            Universal::VisionLayer(_) => K::VisionLayer,
            Universal::NationalIntel(_) => K::NationalIntel,
            Universal::Invalid => K::Invalid,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Universal::Invalid)
    }

    /// Serializable `(kind, value)` pair. Entity payloads map to their
    /// runtime index, enums to their discriminant, scalars to themselves.
    pub fn to_number(&self) -> (UniversalKind, i32) {
        let value = match *self {
            Universal::None | Universal::Invalid => 0,
            Universal::Advance(id) => id.raw as i32,
            Universal::TechFlag(f) => f.0 as i32,
            Universal::Government(id) => id.raw as i32,
            Universal::Achievement(id) => id.raw as i32,
            Universal::Improvement(id) => id.raw as i32,
            Universal::ImprGenus(g) => g.index() as i32,
            Universal::Extra(id) => id.raw as i32,
            Universal::Good(id) => id.raw as i32,
            Universal::Terrain(id) => id.raw as i32,
            Universal::TerrainClass(c) => c.index() as i32,
            Universal::TerrainFlag(f) => f.0 as i32,
            Universal::Nation(id) | Universal::Nationality(id) => id.raw as i32,
            Universal::NationGroup(id) => id.raw as i32,
            Universal::DiplRel(rel) => rel.index() as i32,
            Universal::UnitType(id) => id.raw as i32,
            Universal::UnitTypeFlag(f) => f.0 as i32,
            Universal::UnitClass(id) => id.raw as i32,
            Universal::UnitClassFlag(f) => f.0 as i32,
            Universal::MinVeteran(v) => v as i32,
            Universal::UnitState(s) => s.index() as i32,
            Universal::Activity(a) => a.index() as i32,
            Universal::MinMoveFrags(v)
            | Universal::MinHitPoints(v)
            | Universal::Age(v)
            | Universal::MinTechs(v)
            | Universal::MinSize(v)
            | Universal::MinCulture(v)
            | Universal::MinForeignPct(v)
            | Universal::MaxUnitsOnTile(v)
            | Universal::MinYear(v)
            | Universal::MinCalFrag(v) => v,
            Universal::Action(id) => id.raw as i32,
            Universal::OutputType(o) => o.index() as i32,
            Universal::Specialist(id) => id.raw as i32,
            Universal::AiLevel(l) => l.index() as i32,
            Universal::BaseFlag(f) => f.0 as i32,
            Universal::RoadFlag(f) => f.0 as i32,
            Universal::ExtraFlag(f) => f.0 as i32,
            Universal::TopologyFlag(t) => topology_index(t) as i32,
            Universal::ServerSetting(id) => id.raw as i32,
            Universal::TerrainAlter(a) => a.index() as i32,
            Universal::CityTile(t) => t.index() as i32,
            Universal::CityStatus(s) => s.index() as i32,
            Universal::VisionLayer(v) => v.index() as i32,
            Universal::NationalIntel(n) => n.index() as i32,
        };
        (self.kind(), value)
    }

    /// Inverse of [`Universal::to_number`]. Values that do not resolve against
    /// the ruleset yield [`Universal::Invalid`].
    pub fn from_number(kind: UniversalKind, value: i32, rs: &Ruleset) -> Universal {
        use UniversalKind as K;
        let resolved = match kind {
            K::None => Some(Universal::None),
            K::Invalid => Some(Universal::Invalid),
            K::Advance => id_in(rs.techs.len(), value).map(Universal::Advance),
            K::TechFlag => flag_in(rs.tech_flags.len(), value).map(|f| Universal::TechFlag(TechFlagId(f))),
            K::Government => id_in(rs.governments.len(), value).map(Universal::Government),
            K::Achievement => id_in(rs.achievements.len(), value).map(Universal::Achievement),
            K::Improvement => id_in(rs.buildings.len(), value).map(Universal::Improvement),
            K::ImprGenus => enum_in(BuildingGenus::from_index, value).map(Universal::ImprGenus),
            K::Extra => id_in(rs.extras.len(), value).map(Universal::Extra),
            K::Good => id_in(rs.goods.len(), value).map(Universal::Good),
            K::Terrain => id_in(rs.terrains.len(), value).map(Universal::Terrain),
            K::TerrainClass => enum_in(TerrainClass::from_index, value).map(Universal::TerrainClass),
            K::TerrainFlag => flag_in(rs.terrain_flags.len(), value)
                .map(|f| Universal::TerrainFlag(TerrainFlagId(f))),
            K::Nation => id_in(rs.nations.len(), value).map(Universal::Nation),
            K::NationGroup => id_in(rs.nation_groups.len(), value).map(Universal::NationGroup),
            K::Nationality => id_in(rs.nations.len(), value).map(Universal::Nationality),
            K::DiplRel => enum_in(DiplRel::from_index, value).map(Universal::DiplRel),
            K::UnitType => id_in(rs.unit_types.len(), value).map(Universal::UnitType),
            K::UnitTypeFlag => flag_in(rs.unit_type_flags.len(), value)
                .map(|f| Universal::UnitTypeFlag(UnitTypeFlagId(f))),
            K::UnitClass => id_in(rs.unit_classes.len(), value).map(Universal::UnitClass),
            K::UnitClassFlag => flag_in(rs.unit_class_flags.len(), value)
                .map(|f| Universal::UnitClassFlag(UnitClassFlagId(f))),
            K::MinVeteran => u8::try_from(value).ok().map(Universal::MinVeteran),
            K::UnitState => enum_in(UnitStateProp::from_index, value).map(Universal::UnitState),
            K::Activity => enum_in(Activity::from_index, value).map(Universal::Activity),
            K::MinMoveFrags => Some(Universal::MinMoveFrags(value)),
            K::MinHitPoints => Some(Universal::MinHitPoints(value)),
            K::Age => Some(Universal::Age(value)),
            K::MinTechs => Some(Universal::MinTechs(value)),
            K::Action => id_in(rs.actions.len(), value).map(Universal::Action),
            K::OutputType => enum_in(OutputType::from_index, value).map(Universal::OutputType),
            K::Specialist => id_in(rs.specialists.len(), value).map(Universal::Specialist),
            K::MinSize => Some(Universal::MinSize(value)),
            K::MinCulture => Some(Universal::MinCulture(value)),
            K::MinForeignPct => Some(Universal::MinForeignPct(value)),
            K::AiLevel => enum_in(AiLevel::from_index, value).map(Universal::AiLevel),
            K::MaxUnitsOnTile => Some(Universal::MaxUnitsOnTile(value)),
            K::BaseFlag => flag_in(rs.base_flags.len(), value).map(|f| Universal::BaseFlag(BaseFlagId(f))),
            K::RoadFlag => flag_in(rs.road_flags.len(), value).map(|f| Universal::RoadFlag(RoadFlagId(f))),
            K::ExtraFlag => flag_in(rs.extra_flags.len(), value)
                .map(|f| Universal::ExtraFlag(ExtraFlagId(f))),
            K::MinYear => Some(Universal::MinYear(value)),
            K::MinCalFrag => Some(Universal::MinCalFrag(value)),
            K::TopologyFlag => usize::try_from(value)
                .ok()
                .and_then(|idx| TopologyFlag::ALL.get(idx).copied())
                .map(Universal::TopologyFlag),
            K::ServerSetting => id_in(rs.server_settings.len(), value).map(Universal::ServerSetting),
            K::TerrainAlter => enum_in(TerrainAlteration::from_index, value).map(Universal::TerrainAlter),
            K::CityTile => enum_in(CityTile::from_index, value).map(Universal::CityTile),
            K::CityStatus => enum_in(CityStatus::from_index, value).map(Universal::CityStatus),
            K::VisionLayer => enum_in(VisionLayer::from_index, value).map(Universal::VisionLayer),
            K::NationalIntel => enum_in(NationalIntel::from_index, value).map(Universal::NationalIntel),
        };
        resolved.unwrap_or(Universal::Invalid)
    }

    /// Resolve a rule name of the given kind. Unknown names yield
    /// [`Universal::Invalid`].
    pub fn from_rule_name(kind: UniversalKind, name: &str, rs: &Ruleset) -> Universal {
        use UniversalKind as K;
        let name = name.trim();
        let int = || name.parse::<i32>().ok();
        let resolved = match kind {
            K::None => Some(Universal::None),
            K::Invalid => None,
            K::Advance => rs.techs.id_by_name(name).map(Universal::Advance),
            K::TechFlag => rs.tech_flags.by_name(name).map(|f| Universal::TechFlag(TechFlagId(f))),
            K::Government => rs.governments.id_by_name(name).map(Universal::Government),
            K::Achievement => rs.achievements.id_by_name(name).map(Universal::Achievement),
            K::Improvement => rs.buildings.id_by_name(name).map(Universal::Improvement),
            K::ImprGenus => BuildingGenus::by_name(name).map(Universal::ImprGenus),
            K::Extra => rs.extras.id_by_name(name).map(Universal::Extra),
            K::Good => rs.goods.id_by_name(name).map(Universal::Good),
            K::Terrain => rs.terrains.id_by_name(name).map(Universal::Terrain),
            K::TerrainClass => TerrainClass::by_name(name).map(Universal::TerrainClass),
            K::TerrainFlag => rs
                .terrain_flags
                .by_name(name)
                .map(|f| Universal::TerrainFlag(TerrainFlagId(f))),
            K::Nation => rs.nations.id_by_name(name).map(Universal::Nation),
            K::NationGroup => rs.nation_groups.id_by_name(name).map(Universal::NationGroup),
            K::Nationality => rs.nations.id_by_name(name).map(Universal::Nationality),
            K::DiplRel => DiplRel::by_name(name).map(Universal::DiplRel),
            K::UnitType => rs.unit_types.id_by_name(name).map(Universal::UnitType),
            K::UnitTypeFlag => rs
                .unit_type_flags
                .by_name(name)
                .map(|f| Universal::UnitTypeFlag(UnitTypeFlagId(f))),
            K::UnitClass => rs.unit_classes.id_by_name(name).map(Universal::UnitClass),
            K::UnitClassFlag => rs
                .unit_class_flags
                .by_name(name)
                .map(|f| Universal::UnitClassFlag(UnitClassFlagId(f))),
            K::MinVeteran => name.parse::<u8>().ok().map(Universal::MinVeteran),
            K::UnitState => UnitStateProp::by_name(name).map(Universal::UnitState),
            K::Activity => Activity::by_name(name).map(Universal::Activity),
            K::MinMoveFrags => int().map(Universal::MinMoveFrags),
            K::MinHitPoints => int().map(Universal::MinHitPoints),
            K::Age => int().map(Universal::Age),
            K::MinTechs => int().map(Universal::MinTechs),
            K::Action => rs.actions.id_by_name(name).map(Universal::Action),
            K::OutputType => OutputType::by_name(name).map(Universal::OutputType),
            K::Specialist => rs.specialists.id_by_name(name).map(Universal::Specialist),
            K::MinSize => int().map(Universal::MinSize),
            K::MinCulture => int().map(Universal::MinCulture),
            K::MinForeignPct => int().map(Universal::MinForeignPct),
            K::AiLevel => AiLevel::by_name(name).map(Universal::AiLevel),
            K::MaxUnitsOnTile => int().map(Universal::MaxUnitsOnTile),
            K::BaseFlag => rs.base_flags.by_name(name).map(|f| Universal::BaseFlag(BaseFlagId(f))),
            K::RoadFlag => rs.road_flags.by_name(name).map(|f| Universal::RoadFlag(RoadFlagId(f))),
            K::ExtraFlag => rs
                .extra_flags
                .by_name(name)
                .map(|f| Universal::ExtraFlag(ExtraFlagId(f))),
            K::MinYear => int().map(Universal::MinYear),
            K::MinCalFrag => int().map(Universal::MinCalFrag),
            K::TopologyFlag => TopologyFlag::by_name(name).map(Universal::TopologyFlag),
            K::ServerSetting => rs.server_settings.id_by_name(name).map(Universal::ServerSetting),
            K::TerrainAlter => TerrainAlteration::by_name(name).map(Universal::TerrainAlter),
            K::CityTile => CityTile::by_name(name).map(Universal::CityTile),
            K::CityStatus => CityStatus::by_name(name).map(Universal::CityStatus),
            K::VisionLayer => VisionLayer::by_name(name).map(Universal::VisionLayer),
            K::NationalIntel => NationalIntel::by_name(name).map(Universal::NationalIntel),
        };
        resolved.unwrap_or(Universal::Invalid)
    }

    /// Stable, locale-independent identifier of the payload.
    pub fn rule_name(&self, rs: &Ruleset) -> String {
        let name = match *self {
            Universal::None => Some("None"),
            Universal::Invalid => Some("Invalid"),
            Universal::Advance(id) => rs.techs.rule_name(id),
            Universal::TechFlag(f) => rs.tech_flags.name(f.0),
            Universal::Government(id) => rs.governments.rule_name(id),
            Universal::Achievement(id) => rs.achievements.rule_name(id),
            Universal::Improvement(id) => rs.buildings.rule_name(id),
            Universal::ImprGenus(g) => Some(g.name()),
            Universal::Extra(id) => rs.extras.rule_name(id),
            Universal::Good(id) => rs.goods.rule_name(id),
            Universal::Terrain(id) => rs.terrains.rule_name(id),
            Universal::TerrainClass(c) => Some(c.name()),
            Universal::TerrainFlag(f) => rs.terrain_flags.name(f.0),
            Universal::Nation(id) | Universal::Nationality(id) => rs.nations.rule_name(id),
            Universal::NationGroup(id) => rs.nation_groups.rule_name(id),
            Universal::DiplRel(rel) => Some(rel.name()),
            Universal::UnitType(id) => rs.unit_types.rule_name(id),
            Universal::UnitTypeFlag(f) => rs.unit_type_flags.name(f.0),
            Universal::UnitClass(id) => rs.unit_classes.rule_name(id),
            Universal::UnitClassFlag(f) => rs.unit_class_flags.name(f.0),
            Universal::UnitState(s) => Some(s.name()),
            Universal::Activity(a) => Some(a.name()),
            Universal::Action(id) => rs.actions.rule_name(id),
            Universal::OutputType(o) => Some(o.name()),
            Universal::Specialist(id) => rs.specialists.rule_name(id),
            Universal::AiLevel(l) => Some(l.name()),
            Universal::BaseFlag(f) => rs.base_flags.name(f.0),
            Universal::RoadFlag(f) => rs.road_flags.name(f.0),
            Universal::ExtraFlag(f) => rs.extra_flags.name(f.0),
            Universal::TopologyFlag(t) => Some(t.name()),
            Universal::ServerSetting(id) => rs.server_settings.rule_name(id),
            Universal::TerrainAlter(a) => Some(a.name()),
            Universal::CityTile(t) => Some(t.name()),
            Universal::CityStatus(s) => Some(s.name()),
            Universal::VisionLayer(v) => Some(v.name()),
            Universal::NationalIntel(n) => Some(n.name()),
            Universal::MinVeteran(_)
            | Universal::MinMoveFrags(_)
            | Universal::MinHitPoints(_)
            | Universal::Age(_)
            | Universal::MinTechs(_)
            | Universal::MinSize(_)
            | Universal::MinCulture(_)
            | Universal::MinForeignPct(_)
            | Universal::MaxUnitsOnTile(_)
            | Universal::MinYear(_)
            | Universal::MinCalFrag(_) => return self.to_number().1.to_string(),
        };
        name.unwrap_or(UNKNOWN).to_string()
    }

    /// Display string of the payload, using ruleset labels where they exist.
    pub fn translated_name(&self, rs: &Ruleset) -> String {
        let label = match *self {
            Universal::Advance(id) => rs.techs.label(id),
            Universal::Government(id) => rs.governments.label(id),
            Universal::Achievement(id) => rs.achievements.label(id),
            Universal::Improvement(id) => rs.buildings.label(id),
            Universal::Extra(id) => rs.extras.label(id),
            Universal::Good(id) => rs.goods.label(id),
            Universal::Terrain(id) => rs.terrains.label(id),
            Universal::Nation(id) | Universal::Nationality(id) => rs.nations.label(id),
            Universal::NationGroup(id) => rs.nation_groups.label(id),
            Universal::UnitType(id) => rs.unit_types.label(id),
            Universal::UnitClass(id) => rs.unit_classes.label(id),
            Universal::Action(id) => rs.actions.label(id),
            Universal::Specialist(id) => rs.specialists.label(id),
            Universal::ServerSetting(id) => rs.server_settings.label(id),
            Universal::MinMoveFrags(frags) => return format!("{frags} move fragments"),
            Universal::MinHitPoints(hp) => return format!("{hp} HP"),
            Universal::MinVeteran(level) => return format!("veteran level {level}"),
            Universal::MinYear(year) => return format_year(year),
            Universal::MinSize(size) => return format!("size {size}"),
            Universal::MinTechs(count) => return format!("{count} techs"),
            Universal::MinCulture(points) => return format!("{points} culture points"),
            Universal::MinForeignPct(pct) => return format!("{pct}% foreign citizens"),
            Universal::MaxUnitsOnTile(count) => return format!("{count} units"),
            Universal::Age(turns) => return format!("age {turns}"),
            Universal::MinCalFrag(frag) => return format!("calendar fragment {frag}"),
            _ => None,
        };
        match label {
            Some(label) => label.to_string(),
            None => self.rule_name(rs),
        }
    }
}

fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BC", -year)
    } else {
        format!("{year} AD")
    }
}
