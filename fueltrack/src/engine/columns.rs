use super::reconciler::EditField;

/// Width of the fixed selection checkbox slot ahead of every column.
pub const SELECTION_SLOT_WIDTH: u16 = 3;
/// Width of the fixed row actions slot after every column.
pub const ACTIONS_SLOT_WIDTH: u16 = 8;

/// Columns of the fueling-history table, in their declared base order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    Period,
    Provider,
    FuelType,
    Liters,
    Value,
    UnitPrice,
    Odometer,
    FuelingDays,
    FuelingCount,
    Category,
}

/// How a column's values compare when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Text,
    Numeric,
}

impl ColumnId {
    pub const ALL: [ColumnId; 10] = [
        ColumnId::Period,
        ColumnId::Provider,
        ColumnId::FuelType,
        ColumnId::Liters,
        ColumnId::Value,
        ColumnId::UnitPrice,
        ColumnId::Odometer,
        ColumnId::FuelingDays,
        ColumnId::FuelingCount,
        ColumnId::Category,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Period => "Period",
            Self::Provider => "Provider",
            Self::FuelType => "Fuel",
            Self::Liters => "Liters",
            Self::Value => "Value",
            Self::UnitPrice => "Price/L",
            Self::Odometer => "Odometer",
            Self::FuelingDays => "Days",
            Self::FuelingCount => "Fills",
            Self::Category => "Category",
        }
    }

    /// Default width in terminal cells.
    pub fn default_width(&self) -> u16 {
        match self {
            Self::Period => 25,
            Self::Provider => 20,
            Self::FuelType => 12,
            Self::Liters => 11,
            Self::Value => 13,
            Self::UnitPrice => 12,
            Self::Odometer => 12,
            Self::FuelingDays => 9,
            Self::FuelingCount => 7,
            Self::Category => 16,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Period => ColumnKind::Date,
            Self::Provider | Self::FuelType | Self::Category => ColumnKind::Text,
            Self::Liters
            | Self::Value
            | Self::UnitPrice
            | Self::Odometer
            | Self::FuelingDays
            | Self::FuelingCount => ColumnKind::Numeric,
        }
    }

    /// The transaction field an inline edit of this column writes to, if editable.
    pub fn edit_field(&self) -> Option<EditField> {
        match self {
            Self::Liters => Some(EditField::Liters),
            Self::Value => Some(EditField::Value),
            Self::UnitPrice => Some(EditField::UnitPrice),
            Self::Odometer => Some(EditField::Odometer),
            _ => None,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.edit_field().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: ColumnId,
    pub width: u16,
}

impl ColumnDef {
    pub fn new(id: ColumnId) -> Self {
        Self {
            id,
            width: id.default_width(),
        }
    }
}

pub fn default_columns() -> Vec<ColumnDef> {
    ColumnId::ALL.into_iter().map(ColumnDef::new).collect()
}
