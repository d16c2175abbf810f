use crate::db::Database;
use crate::error::{AgriOpsError, Result};
use crate::models::{CommodityPrice, CropType, Field, SprayReminder, WeatherForecast};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::warn;

// Field queries

impl Database {
    pub fn create_field(&self, field: &Field) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO fields
                    (name, crop, area_ha, latitude, longitude, notes, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    field.name,
                    format!("{:?}", field.crop),
                    field.area_ha,
                    field.latitude,
                    field.longitude,
                    field.notes,
                    field.created_at.to_rfc3339(),
                    field.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_fields(&self) -> Result<Vec<Field>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM fields ORDER BY name")?;
            let fields = stmt
                .query_map([], row_to_field)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(fields)
        })
    }

    pub fn get_field(&self, id: i64) -> Result<Option<Field>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM fields WHERE id = ?1", [id], row_to_field)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn update_field(&self, field: &Field) -> Result<()> {
        let id = field
            .id
            .ok_or_else(|| AgriOpsError::InvalidData("Field has no ID".into()))?;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                UPDATE fields SET
                    name = ?1, crop = ?2, area_ha = ?3, latitude = ?4,
                    longitude = ?5, notes = ?6, updated_at = ?7
                WHERE id = ?8
                "#,
                params![
                    field.name,
                    format!("{:?}", field.crop),
                    field.area_ha,
                    field.latitude,
                    field.longitude,
                    field.notes,
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )?;
            Ok(())
        })
    }

    pub fn delete_field(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM fields WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(AgriOpsError::NotFound(format!("Field {}", id)));
            }
            Ok(())
        })
    }
}

fn row_to_field(row: &Row) -> rusqlite::Result<Field> {
    let crop_str: String = row.get("crop")?;
    let crop = CropType::from_str(&crop_str).unwrap_or_else(|| {
        warn!(crop = %crop_str, "Unknown crop in database, defaulting to Other");
        CropType::Other
    });

    Ok(Field {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        crop,
        area_ha: row.get("area_ha")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        notes: row.get("notes")?,
        created_at: parse_timestamp(row, "created_at")?,
        updated_at: parse_timestamp(row, "updated_at")?,
    })
}

// Spray reminder queries

impl Database {
    pub fn create_reminder(&self, reminder: &SprayReminder) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO spray_reminders
                    (field_id, window_start, window_end, note, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    reminder.field_id,
                    reminder.window_start.to_rfc3339(),
                    reminder.window_end.to_rfc3339(),
                    reminder.note,
                    reminder.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Reminders whose window has not fully passed yet, soonest first.
    pub fn upcoming_reminders(&self, now: DateTime<Utc>) -> Result<Vec<SprayReminder>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM spray_reminders WHERE window_end >= ?1 ORDER BY window_start",
            )?;
            let reminders = stmt
                .query_map([now.to_rfc3339()], row_to_reminder)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(reminders)
        })
    }

    pub fn delete_reminder(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM spray_reminders WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(AgriOpsError::NotFound(format!("Reminder {}", id)));
            }
            Ok(())
        })
    }
}

fn row_to_reminder(row: &Row) -> rusqlite::Result<SprayReminder> {
    Ok(SprayReminder {
        id: Some(row.get("id")?),
        field_id: row.get("field_id")?,
        window_start: parse_timestamp(row, "window_start")?,
        window_end: parse_timestamp(row, "window_end")?,
        note: row.get("note")?,
        created_at: parse_timestamp(row, "created_at")?,
    })
}

// Price cache queries

impl Database {
    pub fn cache_prices(&self, prices: &[CommodityPrice]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for price in prices {
                tx.execute(
                    r#"
                    INSERT INTO price_cache
                        (commodity, price_per_tonne, currency, change_percent, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(commodity) DO UPDATE SET
                        price_per_tonne = excluded.price_per_tonne,
                        currency = excluded.currency,
                        change_percent = excluded.change_percent,
                        updated_at = excluded.updated_at
                    "#,
                    params![
                        price.commodity,
                        price.price_per_tonne,
                        price.currency,
                        price.change_percent,
                        price.updated_at.to_rfc3339(),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn cached_prices(&self) -> Result<Vec<CommodityPrice>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM price_cache ORDER BY commodity")?;
            let prices = stmt
                .query_map([], |row| {
                    Ok(CommodityPrice {
                        commodity: row.get("commodity")?,
                        price_per_tonne: row.get("price_per_tonne")?,
                        currency: row.get("currency")?,
                        change_percent: row.get("change_percent")?,
                        updated_at: parse_timestamp(row, "updated_at")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(prices)
        })
    }
}

// Forecast cache queries

impl Database {
    pub fn cache_forecast(&self, forecast: &WeatherForecast) -> Result<()> {
        let payload = serde_json::to_string(forecast)?;
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO forecast_cache (id, payload, fetched_at)
                VALUES (1, ?1, ?2)
                ON CONFLICT(id) DO UPDATE SET
                    payload = excluded.payload,
                    fetched_at = excluded.fetched_at
                "#,
                params![payload, forecast.fetched_at.to_rfc3339()],
            )?;
            Ok(())
        })
    }

    pub fn cached_forecast(&self) -> Result<Option<WeatherForecast>> {
        let payload: Option<String> = self.with_conn(|conn| {
            conn.query_row("SELECT payload FROM forecast_cache WHERE id = 1", [], |r| {
                r.get(0)
            })
            .optional()
            .map_err(Into::into)
        })?;

        match payload {
            Some(json) => match serde_json::from_str(&json) {
                Ok(forecast) => Ok(Some(forecast)),
                Err(e) => {
                    warn!("Discarding unreadable cached forecast: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

fn parse_timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(column)?;
    Ok(DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn field_crud_roundtrip() {
        let db = db();
        let mut field = Field::new("North Paddock", CropType::Wheat);
        field.area_ha = Some(12.5);

        let id = db.create_field(&field).unwrap();
        let loaded = db.get_field(id).unwrap().unwrap();
        assert_eq!(loaded.name, "North Paddock");
        assert_eq!(loaded.crop, CropType::Wheat);
        assert_eq!(loaded.area_ha, Some(12.5));

        let mut updated = loaded.clone();
        updated.crop = CropType::Barley;
        updated.notes = Some("rotated".into());
        db.update_field(&updated).unwrap();

        let fields = db.list_fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].crop, CropType::Barley);
        assert_eq!(fields[0].notes.as_deref(), Some("rotated"));

        db.delete_field(id).unwrap();
        assert!(db.list_fields().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_field_reports_not_found() {
        let db = db();
        assert!(matches!(
            db.delete_field(99),
            Err(AgriOpsError::NotFound(_))
        ));
    }

    #[test]
    fn unknown_crop_degrades_to_other() {
        let db = db();
        let field = Field::new("Odd", CropType::Wheat);
        let id = db.create_field(&field).unwrap();
        db.with_conn(|conn| {
            conn.execute("UPDATE fields SET crop = 'Quinoa' WHERE id = ?1", [id])?;
            Ok(())
        })
        .unwrap();

        let loaded = db.get_field(id).unwrap().unwrap();
        assert_eq!(loaded.crop, CropType::Other);
    }

    #[test]
    fn reminders_filter_by_window_end() {
        let db = db();
        let past_start = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let past_end = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();
        let future_start = Utc.with_ymd_and_hms(2025, 6, 20, 8, 0, 0).unwrap();
        let future_end = Utc.with_ymd_and_hms(2025, 6, 20, 11, 0, 0).unwrap();

        db.create_reminder(&SprayReminder::for_window(past_start, past_end))
            .unwrap();
        let id = db
            .create_reminder(&SprayReminder::for_window(future_start, future_end))
            .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        let upcoming = db.upcoming_reminders(now).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, Some(id));
        assert_eq!(upcoming[0].window_start, future_start);
    }

    #[test]
    fn reminder_keeps_field_link() {
        let db = db();
        let field_id = db
            .create_field(&Field::new("South Strip", CropType::Rapeseed))
            .unwrap();
        let start = Utc.with_ymd_and_hms(2025, 6, 20, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 20, 11, 0, 0).unwrap();
        db.create_reminder(&SprayReminder::for_window(start, end).with_field(field_id))
            .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(db.upcoming_reminders(now).unwrap()[0].field_id, Some(field_id));
    }

    #[test]
    fn price_cache_upserts_by_commodity() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        let wheat = CommodityPrice {
            commodity: "Wheat".into(),
            price_per_tonne: 210.0,
            currency: "EUR".into(),
            change_percent: Some(0.5),
            updated_at: now,
        };
        db.cache_prices(&[wheat.clone()]).unwrap();

        let updated = CommodityPrice {
            price_per_tonne: 215.0,
            ..wheat
        };
        db.cache_prices(&[updated]).unwrap();

        let cached = db.cached_prices().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].price_per_tonne, 215.0);
    }

    #[test]
    fn forecast_cache_roundtrip() {
        use crate::models::{ForecastLocation, HourlyObservation};

        let db = db();
        assert!(db.cached_forecast().unwrap().is_none());

        let forecast = WeatherForecast {
            fetched_at: Utc.with_ymd_and_hms(2025, 6, 10, 6, 0, 0).unwrap(),
            location: ForecastLocation {
                name: "Testville".into(),
                latitude: 48.1,
                longitude: 11.5,
            },
            hourly: vec![HourlyObservation {
                time: Utc.with_ymd_and_hms(2025, 6, 10, 7, 0, 0).unwrap(),
                temp_c: Some(18.0),
                rain_prob_percent: Some(30.0),
                wind_speed_kmh: None,
            }],
        };
        db.cache_forecast(&forecast).unwrap();

        let cached = db.cached_forecast().unwrap().unwrap();
        assert_eq!(cached.fetched_at, forecast.fetched_at);
        assert_eq!(cached.hourly.len(), 1);
        assert_eq!(cached.hourly[0].rain_prob_percent, Some(30.0));

        // Second write replaces the single cached row
        let mut newer = forecast.clone();
        newer.fetched_at = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        db.cache_forecast(&newer).unwrap();
        assert_eq!(db.cached_forecast().unwrap().unwrap().fetched_at, newer.fetched_at);
    }
}
