use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::color::{self, ColorName, Hsv};
use crate::encode::{ColorFields, PixelRecord, Schema, Table};
use crate::error::{Error, Result};

/// Write `table` as CSV: a header row with the schema's columns, then one row
/// per record.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let schema = table.schema();
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(schema.columns())?;

    let mut row: Vec<String> = Vec::with_capacity(schema.columns().len());
    for record in table.records() {
        row.clear();
        row.push(record.x.to_string());
        row.push(record.y.to_string());
        row.push(record.brightness.to_string());
        if schema != Schema::Brightness {
            row.push(record.brightness_inverted().to_string());
        }
        if let Some(c) = record.color.as_ref().filter(|_| schema.is_color()) {
            row.push(c.rgb.red.to_string());
            row.push(c.rgb.green.to_string());
            row.push(c.rgb.blue.to_string());
            row.push(c.hex_color());
            row.push(format!("{:.1}", c.hsv.hue));
            row.push(format!("{:.1}", c.hsv.saturation));
            row.push(format!("{:.1}", c.hsv.value));
            row.push(c.name.to_string());
        }
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}

/// Read a table written by [`write_csv`].
///
/// The schema is recognised from the header. Dimensions are recovered as the
/// largest `x` and `y` present, so an optimized table may come back smaller
/// than the raster it was cut from.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv = csv::Reader::from_reader(reader);
    let header: Vec<String> = csv.headers()?.iter().map(str::to_owned).collect();
    let schema = Schema::from_columns(&header)
        .ok_or_else(|| Error::Parse(format!("unrecognised header: {}", header.join(","))))?;

    let mut records = Vec::new();
    let (mut width, mut height) = (0, 0);

    for (line, row) in csv.records().enumerate() {
        let row = row?;
        let field = |i: usize| column(&row, i, line + 1);

        let x: u32 = parse(field(0)?, "x")?;
        let y: u32 = parse(field(1)?, "y")?;
        let brightness: u8 = parse(field(2)?, "brightness")?;

        if schema != Schema::Brightness {
            let inverted: u8 = parse(field(3)?, "brightness_inverted")?;
            if inverted != 255 - brightness {
                return Err(Error::Parse(format!(
                    "row {}: brightness_inverted {inverted} does not match brightness {brightness}",
                    line + 1
                )));
            }
        }

        let color = if schema.is_color() {
            let rgb = color::parse_hex(field(7)?)?;
            let channels: (u8, u8, u8) = (
                parse(field(4)?, "r")?,
                parse(field(5)?, "g")?,
                parse(field(6)?, "b")?,
            );
            if channels != (rgb.red, rgb.green, rgb.blue) {
                return Err(Error::Parse(format!(
                    "row {}: hex_color does not match r, g, b",
                    line + 1
                )));
            }
            Some(ColorFields {
                rgb,
                hsv: Hsv {
                    hue: parse(field(8)?, "hue")?,
                    saturation: parse(field(9)?, "saturation")?,
                    value: parse(field(10)?, "value")?,
                },
                name: field(11)?.parse::<ColorName>()?,
            })
        } else {
            None
        };

        width = width.max(x);
        height = height.max(y);
        records.push(PixelRecord {
            x,
            y,
            brightness,
            color,
        });
    }

    Ok(Table::new(schema, width, height, records))
}

fn column(row: &csv::StringRecord, i: usize, line: usize) -> Result<&str> {
    row.get(i)
        .ok_or_else(|| Error::Parse(format!("row {line}: missing column {i}")))
}

fn parse<T: std::str::FromStr>(value: &str, column: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Parse(format!("invalid {column} value {value:?}")))
}

/// Bundle named tables into one deflate-compressed zip archive, one CSV entry
/// per table, in the given order.
pub fn write_archive<'a, I>(files: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a Table)>,
{
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, table) in files {
        zip.start_file(name, options)?;
        write_csv(table, &mut zip)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Entries of an archive written by [`write_archive`], parsed back into tables.
pub fn read_archive(bytes: &[u8]) -> Result<Vec<(String, Table)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut tables = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let name = entry.name().to_owned();
        tables.push((name, read_csv(entry)?));
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::filter::{Thresholds, optimize};
    use crate::resample::resample;
    use image::{DynamicImage, Rgb, RgbImage};

    fn table(schema: Schema) -> Table {
        let img = RgbImage::from_fn(6, 4, |x, y| {
            Rgb([(x * 50) as u8, (255 - y * 60) as u8, ((x * 37 + y * 11) % 256) as u8])
        });
        encode(&resample(&DynamicImage::ImageRgb8(img), 6, 4).unwrap(), schema)
    }

    #[test]
    fn header_and_row_layout() {
        let csv = String::from_utf8(to_csv_bytes(&table(Schema::Color)).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("x,y,brightness,brightness_inverted,r,g,b,hex_color,hue,saturation,value,color_name")
        );
        assert_eq!(csv.lines().count(), 1 + 24);

        let first: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(first.len(), 12);
        assert_eq!(&first[..2], &["1", "1"]);
        assert!(first[7].starts_with('#') && first[7].len() == 7);
        assert!(first[8].contains('.'));

        let gray = String::from_utf8(to_csv_bytes(&table(Schema::Brightness)).unwrap()).unwrap();
        assert_eq!(gray.lines().next(), Some("x,y,brightness"));
    }

    #[test]
    fn csv_round_trips() {
        for schema in [Schema::Brightness, Schema::BrightnessInverted, Schema::Color] {
            let original = table(schema);
            let parsed = read_csv(to_csv_bytes(&original).unwrap().as_slice()).unwrap();
            assert_eq!(parsed, original);
        }
    }

    #[test]
    fn unknown_header_is_rejected() {
        let err = read_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn inconsistent_rows_are_rejected() {
        let bad_inverse = "x,y,brightness,brightness_inverted\n1,1,10,10\n";
        assert!(matches!(read_csv(bad_inverse.as_bytes()), Err(Error::Parse(_))));

        let bad_hex = "x,y,brightness,brightness_inverted,r,g,b,hex_color,hue,saturation,value,color_name\n\
                       1,1,76,179,255,0,0,#00ff00,0.0,100.0,100.0,Red\n";
        assert!(matches!(read_csv(bad_hex.as_bytes()), Err(Error::Parse(_))));
    }

    #[test]
    fn archive_entries_match_csv_bytes() {
        let full = table(Schema::Color);
        let optimized = optimize(
            &full,
            &Thresholds {
                brightness: 30,
                saturation: 5,
            },
        );
        let bytes = write_archive([("full.csv", &full), ("optimized.csv", &optimized)]).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut text = Vec::new();
        archive.by_name("optimized.csv").unwrap().read_to_end(&mut text).unwrap();
        assert_eq!(text, to_csv_bytes(&optimized).unwrap());

        let tables = read_archive(&bytes).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, "full.csv");
        assert_eq!(tables[0].1, full);
        assert_eq!(tables[1].1.records(), optimized.records());
    }
}
